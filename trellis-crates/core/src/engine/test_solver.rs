#![cfg(test)]
//! Helpers for testing propagators. The [`TestSolver`] sets up a [`Store`] for a specific
//! scenario and exposes the operations a search would perform on it.
use super::DomainId;
use super::IntervalDomain;
use super::Store;
use super::StoreOptions;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::propagation::NegatablePropagator;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;

/// A store with a few conveniences which make test scenarios read more easily.
#[derive(Debug)]
pub(crate) struct TestSolver {
    pub(crate) store: Store,
}

impl Default for TestSolver {
    fn default() -> Self {
        TestSolver {
            store: Store::new(StoreOptions {
                check_fixpoints: true,
                ..Default::default()
            }),
        }
    }
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.store.new_variable(lb, ub)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.store.new_sparse_variable(values)
    }

    /// Imposes the constraint and computes the fixpoint of the store.
    ///
    /// Panics if the constraint is not a valid model.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Contradiction>
    where
        Constructor: PropagatorConstructor,
    {
        let handle = self
            .store
            .impose(constructor)
            .expect("the constraint is a valid model");
        self.propagate()?;

        Ok(handle)
    }

    /// Computes the fixpoint of the store. Panics if a propagator narrowed a domain when it was
    /// run again right after returning.
    pub(crate) fn propagate(&mut self) -> PropagationStatus {
        let result = self.store.consistency();
        assert_eq!(
            self.store.num_fixpoint_violations(),
            0,
            "a propagator did not reach its fixpoint"
        );
        result
    }

    pub(crate) fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> &P {
        self.store
            .propagator(handle)
            .expect("the handle refers to a propagator of this store")
    }

    pub(crate) fn satisfied<P: Propagator>(&self, handle: PropagatorHandle<P>) -> bool {
        self.propagator(handle).satisfied(self.store.domains())
    }

    pub(crate) fn not_satisfied<P: NegatablePropagator>(&self, handle: PropagatorHandle<P>) -> bool {
        self.propagator(handle).not_satisfied(self.store.domains())
    }

    pub(crate) fn is_entailed<P>(&self, handle: PropagatorHandle<P>) -> bool {
        self.store.is_entailed(handle)
    }

    pub(crate) fn is_watching<P>(&self, var: DomainId, handle: PropagatorHandle<P>) -> bool {
        self.store.is_watching(var, handle)
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.store.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.store.upper_bound(var)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32) -> bool {
        self.store.contains(var, value)
    }

    pub(crate) fn is_fixed(&self, var: DomainId) -> bool {
        self.store.is_fixed(var)
    }

    pub(crate) fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.store.fixed_value(var)
    }

    pub(crate) fn domain(&self, var: DomainId) -> &IntervalDomain {
        self.store.domain(var)
    }

    pub(crate) fn set_lower_bound(&mut self, var: DomainId, value: i32) {
        let _ = self
            .store
            .set_lower_bound(var, value)
            .expect("the bound does not empty the domain");
    }

    pub(crate) fn set_upper_bound(&mut self, var: DomainId, value: i32) {
        let _ = self
            .store
            .set_upper_bound(var, value)
            .expect("the bound does not empty the domain");
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) {
        let _ = self
            .store
            .remove(var, value)
            .expect("the removal does not empty the domain");
    }

    pub(crate) fn assign(&mut self, var: DomainId, value: i32) {
        let _ = self
            .store
            .assign(var, value)
            .expect("the value is in the domain");
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.store.new_checkpoint();
    }

    pub(crate) fn restore(&mut self, level: usize) {
        self.store.restore(level);
    }
}
