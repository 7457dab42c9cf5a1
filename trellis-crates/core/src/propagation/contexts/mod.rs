mod constructor_context;
mod propagation_context;

pub(crate) use constructor_context::ImposeRequests;
pub use constructor_context::PropagatorConstructorContext;
pub use propagation_context::*;
