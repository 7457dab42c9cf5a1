//! Constraints which require their variables to take pairwise distinct values.
mod alldiff;
mod alldifferent;
mod circuit;
mod grounded_prefix;
mod hall_intervals;
mod scc;
mod subcircuit;

pub use alldiff::Alldiff;
pub use alldiff::AlldiffArgs;
pub use alldifferent::Alldifferent;
pub use alldifferent::AlldifferentArgs;
pub use circuit::Circuit;
pub use circuit::CircuitArgs;
pub use subcircuit::Subcircuit;
pub use subcircuit::SubcircuitArgs;
