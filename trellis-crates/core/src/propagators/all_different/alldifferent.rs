use super::grounded_prefix::all_fixed_and_distinct;
use super::grounded_prefix::GroundedPrefix;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::check_distinct_variables;

/// The arguments of [`Alldifferent`].
#[derive(Clone, Debug)]
pub struct AlldifferentArgs {
    xs: Vec<DomainId>,
}

impl AlldifferentArgs {
    /// Fails if a variable occurs more than once in `xs`.
    pub fn new(xs: Vec<DomainId>) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;
        Ok(AlldifferentArgs { xs })
    }
}

impl PropagatorConstructor for AlldifferentArgs {
    type PropagatorImpl = Alldifferent;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Alldifferent, ModelError> {
        Ok(Alldifferent {
            variables: GroundedPrefix::new(self.xs, &mut context),
        })
    }
}

/// The variables take pairwise distinct values.
///
/// Only reacts to variables becoming fixed, whose value is then removed from all other
/// variables.
#[derive(Clone, Debug)]
pub struct Alldifferent {
    variables: GroundedPrefix,
}

impl Propagator for Alldifferent {
    fn name(&self) -> &str {
        "Alldifferent"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.variables.variables().to_vec()
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.variables.propagate(context)?;

        // The last variable cannot clash with anything once all others are fixed.
        if self.variables.num_grounded(context) + 1 >= self.variables.variables().len() {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        all_fixed_and_distinct(domains, self.variables.variables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn fixed_values_are_removed_from_the_others() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(1, 3);
        let z = solver.new_variable(1, 3);

        let handle = solver
            .new_propagator(AlldifferentArgs::new(vec![x, y, z]).expect("distinct variables"))
            .expect("no clash");
        assert_eq!(solver.domain(y).size(), 3);

        solver.assign(x, 2);
        solver.propagate().expect("no clash");

        assert!(!solver.contains(y, 2));
        assert!(!solver.contains(z, 2));
        assert!(!solver.is_watching(x, handle));
        assert!(solver.is_watching(y, handle));
    }

    #[test]
    fn removals_cascade() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 1);
        let y = solver.new_variable(1, 2);
        let z = solver.new_variable(1, 3);

        let handle = solver
            .new_propagator(AlldifferentArgs::new(vec![z, y, x]).expect("distinct variables"))
            .expect("no clash");

        assert_eq!(solver.fixed_value(y), Some(2));
        assert_eq!(solver.fixed_value(z), Some(3));
        assert!(solver.is_entailed(handle));
        assert!(solver.satisfied(handle));
    }

    #[test]
    fn equal_fixed_values_are_a_contradiction() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(4, 4);
        let y = solver.new_variable(4, 4);

        let result =
            solver.new_propagator(AlldifferentArgs::new(vec![x, y]).expect("distinct variables"));

        assert!(result.is_err());
    }

    #[test]
    fn prefix_is_restored_on_backtrack() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 4);
        let y = solver.new_variable(1, 4);
        let z = solver.new_variable(1, 4);

        let handle = solver
            .new_propagator(AlldifferentArgs::new(vec![x, y, z]).expect("distinct variables"))
            .expect("no clash");

        solver.new_checkpoint();
        solver.assign(z, 1);
        solver.propagate().expect("no clash");
        solver.assign(y, 2);
        solver.propagate().expect("no clash");
        assert!(solver.is_entailed(handle));
        solver.assert_bounds(x, 3, 4);

        solver.restore(0);
        assert!(!solver.is_entailed(handle));
        assert!(solver.is_watching(z, handle));

        solver.assign(x, 1);
        solver.propagate().expect("no clash");
        assert!(!solver.contains(z, 1));
        assert!(!solver.contains(y, 1));
    }
}
