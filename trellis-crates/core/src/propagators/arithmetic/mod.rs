//! Arithmetic relations between a few variables.
//!
//! Bounds are computed with 64-bit integers, so intermediate results cannot overflow. Constraints
//! whose results might not fit in 32 bits for the initial domains are rejected when imposed.
mod abs_x_eq_y;
mod distance;
mod sum_weight;
mod x_div_y_eq_z;
mod x_mod_y_eq_z;
mod x_mul_y_eq_z;
mod x_plus_y_eq_z;

pub use abs_x_eq_y::AbsXeqY;
pub use distance::Distance;
pub use sum_weight::SumWeight;
pub use sum_weight::SumWeightArgs;
pub use x_div_y_eq_z::XdivYeqZ;
pub use x_mod_y_eq_z::XmodYeqZ;
pub use x_mul_y_eq_z::XmulYeqZ;
pub use x_plus_y_eq_z::XplusYeqZ;

use crate::basic_types::ModelError;
use crate::engine::DomainId;
use crate::engine::EmptyDomain;
use crate::propagation::Domains;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;

/// The bounds of `var` as 64-bit integers.
fn bounds(domains: Domains, var: DomainId) -> (i64, i64) {
    (
        i64::from(domains.lower_bound(var)),
        i64::from(domains.upper_bound(var)),
    )
}

/// Narrows `var` to `{lower_bound..upper_bound}`, where the bounds may lie outside of the 32-bit
/// range.
fn set_bounds(
    context: &mut PropagationContext,
    var: DomainId,
    lower_bound: i64,
    upper_bound: i64,
) -> Result<bool, EmptyDomain> {
    if lower_bound > upper_bound
        || lower_bound > i64::from(i32::MAX)
        || upper_bound < i64::from(i32::MIN)
    {
        return Err(EmptyDomain);
    }

    context.set_bounds(var, saturate(lower_bound), saturate(upper_bound))
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Rejects a constraint for which `value`, computed from the initial domains, does not fit in
/// 32 bits.
fn check_overflow(constraint: &str, value: i64) -> Result<(), ModelError> {
    if i32::try_from(value).is_err() {
        return Err(ModelError::Overflow(format!(
            "{constraint} can produce {value}, which does not fit in 32 bits"
        )));
    }

    Ok(())
}

/// The smallest and largest of the given values.
fn min_max(values: impl IntoIterator<Item = i64>) -> (i64, i64) {
    values
        .into_iter()
        .fold((i64::MAX, i64::MIN), |(min, max), value| {
            (min.min(value), max.max(value))
        })
}

/// Whether `value` is in the domain of `var`, where `value` may lie outside of the 32-bit range.
fn contains(domains: Domains, var: DomainId, value: i64) -> bool {
    i32::try_from(value).is_ok_and(|value| domains.contains(var, value))
}

/// Removes `value` from `var`, where `value` may lie outside of the 32-bit range.
fn remove(context: &mut PropagationContext, var: DomainId, value: i64) -> Result<bool, EmptyDomain> {
    match i32::try_from(value) {
        Ok(value) => context.remove(var, value),
        Err(_) => Ok(false),
    }
}
