use super::check_booleans;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// `x_1 xor ... xor x_n = result`, i.e. `result` is the parity of the number of ones.
#[derive(Clone, Debug)]
pub struct XorBool {
    xs: Vec<DomainId>,
    result: DomainId,
}

impl XorBool {
    pub fn new(xs: Vec<DomainId>, result: DomainId) -> Self {
        XorBool { xs, result }
    }

    fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.xs.iter().copied().chain([self.result])
    }

    /// The parity of the ones over the variables and `result`, once all of them are fixed.
    fn parity(&self, domains: Domains) -> Option<i32> {
        self.variables()
            .map(|var| domains.fixed_value(var))
            .sum::<Option<i32>>()
            .map(|ones| ones % 2)
    }

    /// Makes the parity of the ones over the variables and `result` equal to `parity`.
    fn propagate(&self, context: &mut PropagationContext, parity: i32) -> PropagationStatus {
        let mut ones = 0;
        let mut open = None;

        for var in self.variables() {
            match (context.fixed_value(var), open) {
                (Some(value), _) => ones += value,
                (None, None) => open = Some(var),
                // At least two variables are open.
                (None, Some(_)) => return Ok(()),
            }
        }

        match open {
            Some(var) => {
                let _ = context.assign(var, (parity + ones) % 2)?;
            }
            None if ones % 2 != parity => return Err(Contradiction),
            None => {}
        }

        context.remove_constraint();
        Ok(())
    }
}

impl PropagatorConstructor for XorBool {
    type PropagatorImpl = XorBool;

    fn create(self, context: PropagatorConstructorContext) -> Result<XorBool, ModelError> {
        check_booleans(context.domains(), self.xs.iter().chain([&self.result]))?;
        Ok(self)
    }
}

impl Propagator for XorBool {
    fn name(&self) -> &str {
        "XorBool"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.variables().collect()
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.propagate(context, 0)
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.parity(domains) == Some(0)
    }
}

impl NegatablePropagator for XorBool {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.propagate(context, 1)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.parity(domains) == Some(1)
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn last_open_variable_restores_the_parity() {
        let mut solver = TestSolver::default();
        let xs = vec![
            solver.new_variable(1, 1),
            solver.new_variable(0, 1),
            solver.new_variable(1, 1),
        ];
        let result = solver.new_variable(1, 1);

        let handle = solver
            .new_propagator(XorBool::new(xs.clone(), result))
            .expect("consistent");

        assert_eq!(solver.fixed_value(xs[1]), Some(1));
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn result_is_computed_once_the_variables_are_fixed() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 1), solver.new_variable(0, 1)];
        let result = solver.new_variable(0, 1);

        let _ = solver
            .new_propagator(XorBool::new(xs.clone(), result))
            .expect("consistent");
        assert!(!solver.is_fixed(result));

        solver.assign(xs[0], 1);
        solver.assign(xs[1], 0);
        solver.propagate().expect("consistent");

        assert_eq!(solver.fixed_value(result), Some(1));
    }

    #[test]
    fn wrong_parity_fails() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(1, 1), solver.new_variable(1, 1)];
        let result = solver.new_variable(1, 1);

        let result = solver.new_propagator(XorBool::new(xs, result));

        assert!(result.is_err());
    }
}
