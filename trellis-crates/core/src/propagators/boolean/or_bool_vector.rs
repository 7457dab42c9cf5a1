use super::check_booleans;
use super::junction::agrees;
use super::junction::Junction;
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

/// The arguments of [`OrBoolVector`].
#[derive(Clone, Debug)]
pub struct OrBoolVectorArgs {
    xs: Vec<DomainId>,
    result: DomainId,
}

impl OrBoolVectorArgs {
    pub fn new(xs: Vec<DomainId>, result: DomainId) -> Self {
        OrBoolVectorArgs { xs, result }
    }
}

impl PropagatorConstructor for OrBoolVectorArgs {
    type PropagatorImpl = OrBoolVector;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<OrBoolVector, ModelError> {
        check_booleans(context.domains(), self.xs.iter().chain([&self.result]))?;

        Ok(OrBoolVector {
            xs: Junction::new(self.xs, 0, &mut context),
            result: self.result,
        })
    }
}

/// `result = 1` exactly when some variable is 1.
#[derive(Clone, Debug)]
pub struct OrBoolVector {
    xs: Junction,
    result: DomainId,
}

impl Propagator for OrBoolVector {
    fn name(&self) -> &str {
        "OrBoolVector"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.xs.variables().to_vec();
        arguments.push(self.result);
        arguments
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.xs.propagate(context, self.result, false)
    }

    fn satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.xs, self.result, false)
    }
}

impl NegatablePropagator for OrBoolVector {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.xs.propagate(context, self.result, true)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.xs, self.result, true)
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
    fn a_one_decides_the_result() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 1), solver.new_variable(0, 1)];
        let result = solver.new_variable(0, 1);

        let handle = solver
            .new_propagator(OrBoolVectorArgs::new(xs.clone(), result))
            .expect("consistent");

        solver.assign(xs[1], 1);
        solver.propagate().expect("consistent");

        assert_eq!(solver.fixed_value(result), Some(1));
        assert!(solver.is_entailed(handle));
        assert!(!solver.is_fixed(xs[0]));
    }

    #[test]
    fn all_zeros_make_the_result_zero() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 0), solver.new_variable(0, 1)];
        let result = solver.new_variable(0, 1);

        let _ = solver
            .new_propagator(OrBoolVectorArgs::new(xs.clone(), result))
            .expect("consistent");
        solver.assign(xs[1], 0);
        solver.propagate().expect("consistent");

        assert_eq!(solver.fixed_value(result), Some(0));
    }

    #[test]
    fn a_true_result_with_one_open_variable_fixes_it_to_one() {
        let mut solver = TestSolver::default();
        let xs = vec![
            solver.new_variable(0, 0),
            solver.new_variable(0, 1),
            solver.new_variable(0, 0),
        ];
        let result = solver.new_variable(1, 1);

        let _ = solver
            .new_propagator(OrBoolVectorArgs::new(xs.clone(), result))
            .expect("consistent");

        assert_eq!(solver.fixed_value(xs[1]), Some(1));
    }

    #[test]
    fn a_true_result_without_open_variables_fails() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 0), solver.new_variable(0, 0)];
        let result = solver.new_variable(1, 1);

        let result = solver.new_propagator(OrBoolVectorArgs::new(xs, result));

        assert!(result.is_err());
    }
}
