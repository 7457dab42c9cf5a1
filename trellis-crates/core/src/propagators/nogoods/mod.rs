//! Nogoods: combinations of assignments which must not occur together.
//!
//! A nogood is only woken up by changes to two of its variables, tracked by a [`WatchSet`]
//! instead of the subscriptions the store derives from the arguments of a propagator.
mod nogood;
mod watch_set;

pub use nogood::Nogood;
pub use nogood::NogoodArgs;
use watch_set::Literal;
use watch_set::WatchSet;
