//! The protocol between the [`Store`](crate::Store) and the constraints imposed on it.
//!
//! # Background
//!
//! A propagator takes as input a set of variables (<code>x<sub>i</sub> ∈ X</code>) and for each
//! variable a corresponding domain (<code>D<sub>i</sub> ∈ D</code>); it can then be seen as a
//! function which maps `D ↦ D'` such that <code>D'<sub>i</sub> ⊆ D<sub>i</sub></code> for all
//! variables. A propagator is at its fixpoint if applying it again changes nothing.
//!
//! For more information about the construction of these types of propagation engines, we
//! refer to [\[1\]](https://dl.acm.org/doi/pdf/10.1145/1452044.1452046).
//!
//! # Lifecycle
//!
//! A constraint starts out as a [`PropagatorConstructor`], which performs the structural checks
//! of the constraint but has no access to a store. [`Store::impose`](crate::Store::impose) turns
//! it into a [`Propagator`] through [`PropagatorConstructor::create`], subscribes the propagator
//! to its arguments and schedules it. From then on the store calls
//! [`Propagator::consistency`] whenever an argument changed with at least the granularity given
//! by [`Propagator::consistency_pruning_event`].
//!
//! A propagator which finds itself entailed calls [`PropagationContext::remove_constraint`]; it is
//! ignored until the store backtracks past the level at which that happened. A constraint imposed
//! during search is retired when the store backtracks below the level at which it was imposed.
//!
//! Propagators implementing [`NegatablePropagator`] can also enforce the negation of their
//! relation, which allows them to be combined by meta constraints such as
//! [`And`](crate::propagators::And), [`Or`](crate::propagators::Or) and
//! [`Reified`](crate::propagators::Reified).
//!
//! # Bibliography
//!
//! \[1\] C. Schulte and P. J. Stuckey, ‘Efficient constraint propagation engines’, ACM Transactions
//! on Programming Languages and Systems (TOPLAS), vol. 31, no. 1, pp. 1–43, 2008.

mod constructor;
mod contexts;
mod domains;
mod propagator;
mod propagator_id;
mod propagator_store;

pub use constructor::*;
pub(crate) use contexts::ImposeRequests;
pub use contexts::PropagationContext;
pub use contexts::PropagatorConstructorContext;
pub use domains::*;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub use propagator_store::PropagatorHandle;
pub(crate) use propagator_store::PropagatorStore;
