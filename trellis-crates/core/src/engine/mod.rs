mod assignments;
mod domains;
mod notifications;
mod propagator_queue;
mod store;
mod store_options;
mod store_statistics;
#[cfg(test)]
pub(crate) mod test_solver;
mod trailed;
mod variables;

pub use assignments::*;
pub use domains::*;
pub use notifications::*;
pub(crate) use propagator_queue::PropagatorQueue;
pub use store::Store;
pub use store_options::StoreOptions;
pub(crate) use store_statistics::StoreStatistics;
pub use trailed::*;
pub use variables::*;
