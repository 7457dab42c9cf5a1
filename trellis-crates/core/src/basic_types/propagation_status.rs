use crate::engine::EmptyDomain;

/// The result of running a propagator: either the propagator reached its local fixpoint, or the
/// current domains admit no solution of the constraint.
pub type PropagationStatus = Result<(), Contradiction>;

/// The current branch of the search has no solution.
///
/// Carries no payload; the only sensible reaction is to restore the store to an earlier level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contradiction;

impl From<EmptyDomain> for Contradiction {
    fn from(_: EmptyDomain) -> Self {
        Contradiction
    }
}
