//! # Trellis
//! A finite-domain constraint propagation engine.
//!
//! Variables are created on a [`Store`] with a finite set of `i32` values (an
//! [`IntervalDomain`]). Constraints from [`propagators`] are imposed on the store, which
//! schedules them whenever the domains of their arguments change and runs them until no domain
//! can be narrowed any further.
//!
//! The store is meant to be driven by a backtracking search: it opens levels through
//! [`Store::new_checkpoint`] and undoes every change made above a level through
//! [`Store::restore`].
//!
//! ```rust
//! use trellis_core::propagators::AlldifferentArgs;
//! use trellis_core::propagators::Relation;
//! use trellis_core::propagators::XRelY;
//! use trellis_core::Store;
//!
//! let mut store = Store::default();
//! let x = store.new_variable(1, 3);
//! let y = store.new_variable(1, 3);
//! let z = store.new_variable(1, 3);
//!
//! let _ = store
//!     .impose(AlldifferentArgs::new(vec![x, y, z]).expect("no duplicate arguments"))
//!     .expect("valid model");
//! let _ = store
//!     .impose(XRelY::new(x, Relation::Lt, y))
//!     .expect("valid model");
//! store.consistency().expect("the model is consistent");
//!
//! store.new_checkpoint();
//! let _ = store.assign(z, 1).expect("1 is in the domain of z");
//! store.consistency().expect("x = 2, y = 3 remains");
//! assert_eq!(store.fixed_value(x), Some(2));
//! assert_eq!(store.fixed_value(y), Some(3));
//!
//! store.restore(0);
//! assert_eq!(store.size(z), 3);
//! ```
//!
//! # Feature flags
//! - `debug-checks`: Enable expensive assertions in the engine. Turning this on slows down
//!   propagation considerably.
//! - `clap`: Derive [`clap::Args`](https://docs.rs/clap) for [`StoreOptions`].
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub mod propagation;
pub mod propagators;
pub mod statistics;
#[doc(hidden)]
pub mod trellis_asserts;

pub use convert_case;

pub use crate::basic_types::Contradiction;
pub use crate::basic_types::ModelError;
pub use crate::basic_types::PropagationStatus;
#[doc(hidden)]
pub use crate::engine::Assignments;
pub use crate::engine::DomainId;
pub use crate::engine::EmptyDomain;
pub use crate::engine::IntDomainEvent;
pub use crate::engine::Interval;
pub use crate::engine::IntervalDomain;
pub use crate::engine::PruningEvent;
pub use crate::engine::Store;
pub use crate::engine::StoreOptions;
pub use crate::engine::TimeStamp;
pub use crate::engine::TimeStampValue;
#[doc(hidden)]
pub use crate::engine::TrailedValues;
pub use crate::engine::VariableWeights;
pub use crate::propagation::PropagatorHandle;
