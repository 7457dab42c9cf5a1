//! Constraints which count how many variables of a list take certain values.
//!
//! Apart from [`Values`], they share the same bookkeeping: a variable which certainly takes a
//! counted value, or certainly does not, is moved into a settled prefix of the list together
//! with a running count of the members in it.
mod among;
mod at_least;
mod count;
mod count_bounds;
mod matching;
mod tally;
mod values;

pub use among::Among;
pub use among::AmongArgs;
pub use at_least::AtLeast;
pub use at_least::AtLeastArgs;
pub use count::Count;
pub use count::CountArgs;
pub use count_bounds::CountBounds;
pub use count_bounds::CountBoundsArgs;
pub use values::Values;
pub use values::ValuesArgs;

use tally::count_members;
use tally::Tally;

/// A number of list elements as a domain value. Lists are far shorter than `i32::MAX`.
fn to_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
