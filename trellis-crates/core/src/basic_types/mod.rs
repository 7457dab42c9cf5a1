mod model_error;
mod propagation_status;
mod trail;

pub use model_error::ModelError;
pub use propagation_status::*;
pub(crate) use trail::Trail;
