//! Constraints over 0/1 variables.
//!
//! These express relations which could also be built from meta constraints, but they count
//! fixed variables instead of asking children for their status. The vector constraints keep the
//! variables which no longer matter in a backtrackable prefix, so a call only scans the variables
//! which are still open.
//!
//! Every variable must have a domain within `{0, 1}` when the constraint is imposed, otherwise
//! imposing fails with [`ModelError::NonBooleanVariable`](crate::ModelError::NonBooleanVariable).
mod and_bool_vector;
mod bool_clause;
mod channel_imply;
mod eq_bool;
mod junction;
mod or_bool_vector;
mod xor_bool;

pub use and_bool_vector::AndBoolVector;
pub use and_bool_vector::AndBoolVectorArgs;
pub use bool_clause::BoolClause;
pub use bool_clause::BoolClauseArgs;
pub use channel_imply::ChannelImply;
pub use channel_imply::ChannelImplyArgs;
pub use eq_bool::EqBool;
pub use or_bool_vector::OrBoolVector;
pub use or_bool_vector::OrBoolVectorArgs;
pub use xor_bool::XorBool;

use crate::basic_types::ModelError;
use crate::engine::DomainId;
use crate::propagation::Domains;
use crate::propagators::check_boolean;

fn check_booleans<'a>(
    domains: Domains,
    vars: impl IntoIterator<Item = &'a DomainId>,
) -> Result<(), ModelError> {
    vars.into_iter().try_for_each(|&var| check_boolean(domains, var))
}
