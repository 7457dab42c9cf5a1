use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;

/// A typed reference to a propagator imposed on a [`Store`](crate::Store).
///
/// The type parameter allows [`Store::propagator`](crate::Store::propagator) to return the
/// concrete propagator instead of a `dyn Propagator`.
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// The [`PropagatorId`] of the propagator this handle refers to.
    pub fn propagator_id(&self) -> PropagatorId {
        self.id
    }
}

impl<P> Debug for PropagatorHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropagatorHandle({})", self.id.0)
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl<P> PartialEq for PropagatorHandle<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for PropagatorHandle<P> {}

impl<P> Hash for PropagatorHandle<P> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Owns the propagators of a store.
#[derive(Default, Debug)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

impl PropagatorStore {
    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_key()
    }

    pub(crate) fn push<P: Propagator>(&mut self, propagator: P) -> PropagatorHandle<P> {
        PropagatorHandle::new(self.propagators.push(Box::new(propagator)))
    }

    pub(crate) fn get_propagator<P: Propagator>(
        &self,
        handle: PropagatorHandle<P>,
    ) -> Option<&P> {
        self.propagators
            .get(handle.id)
            .and_then(|propagator| (**propagator).downcast_ref::<P>())
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        &*self.propagators[index]
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        &mut *self.propagators[index]
    }
}
