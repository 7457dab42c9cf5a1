use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// `x ∈ domain`.
#[derive(Clone, Debug)]
pub struct XinDomain {
    x: DomainId,
    domain: IntervalDomain,
}

impl XinDomain {
    pub fn new(x: DomainId, domain: IntervalDomain) -> XinDomain {
        XinDomain { x, domain }
    }
}

impl PropagatorConstructor for XinDomain {
    type PropagatorImpl = XinDomain;

    fn create(self, _context: PropagatorConstructorContext) -> Result<XinDomain, ModelError> {
        Ok(self)
    }
}

impl Propagator for XinDomain {
    fn name(&self) -> &str {
        "XinDomain"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x]
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let _ = context.intersect(self.x, &self.domain)?;
        context.remove_constraint();
        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        domains.domain(self.x).is_subset_of(&self.domain)
    }
}

impl NegatablePropagator for XinDomain {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let _ = context.subtract(self.x, &self.domain)?;
        context.remove_constraint();
        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        !domains.domain(self.x).is_intersecting(&self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn the_domain_is_intersected() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(XinDomain::new(x, IntervalDomain::from_values([1, 2, 3, 8, 12])))
            .expect("non-empty domain");

        assert_eq!(solver.domain(x).values().collect::<Vec<_>>(), vec![1, 2, 3, 8]);
    }

    #[test]
    fn satisfaction_is_containment_and_violation_is_disjointness() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let constraint = XinDomain::new(x, IntervalDomain::new(3, 10));

        assert!(!constraint.satisfied(solver.store.domains()));
        assert!(!constraint.not_satisfied(solver.store.domains()));

        solver.set_lower_bound(x, 3);
        assert!(constraint.satisfied(solver.store.domains()));

        let y = solver.new_variable(-5, 2);
        assert!(XinDomain::new(y, IntervalDomain::new(3, 10)).not_satisfied(solver.store.domains()));
    }
}
