use super::grounded_prefix::all_fixed_and_distinct;
use super::grounded_prefix::GroundedPrefix;
use super::hall_intervals::hall_lower_bounds;
use crate::basic_types::Contradiction;
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
use crate::propagation::ReadDomains;
use crate::propagators::check_distinct_variables;

/// The arguments of [`Alldiff`].
#[derive(Clone, Debug)]
pub struct AlldiffArgs {
    xs: Vec<DomainId>,
}

impl AlldiffArgs {
    /// Fails if a variable occurs more than once in `xs`.
    pub fn new(xs: Vec<DomainId>) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;
        Ok(AlldiffArgs { xs })
    }
}

impl PropagatorConstructor for AlldiffArgs {
    type PropagatorImpl = Alldiff;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Alldiff, ModelError> {
        Ok(Alldiff {
            variables: GroundedPrefix::new(self.xs, &mut context),
        })
    }
}

/// The variables take pairwise distinct values, bounds consistent.
///
/// Next to removing the values of fixed variables, the bounds of the variables are tightened
/// with Hall intervals (J.-F. Puget, 'A fast algorithm for the bound consistency of alldiff
/// constraints', AAAI 1998).
#[derive(Clone, Debug)]
pub struct Alldiff {
    variables: GroundedPrefix,
}

fn to_bound(value: i64) -> Result<i32, Contradiction> {
    i32::try_from(value).map_err(|_| Contradiction)
}

impl Propagator for Alldiff {
    fn name(&self) -> &str {
        "Alldiff"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.variables.variables().to_vec()
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Bound
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            self.variables.propagate(context)?;

            let xs = self.variables.variables();
            let ranges = xs
                .iter()
                .map(|&x| {
                    (
                        i64::from(context.lower_bound(x)),
                        i64::from(context.upper_bound(x)),
                    )
                })
                .collect::<Vec<_>>();
            let lower_bounds = hall_lower_bounds(&ranges)?;
            let negated_ranges = ranges
                .iter()
                .map(|&(low, high)| (-high, -low))
                .collect::<Vec<_>>();
            let negated_upper_bounds = hall_lower_bounds(&negated_ranges)?;

            let mut changed = false;
            for (index, &x) in xs.iter().enumerate() {
                changed |= context.set_bounds(
                    x,
                    to_bound(lower_bounds[index])?,
                    to_bound(-negated_upper_bounds[index])?,
                )?;
            }

            if !changed {
                break;
            }
        }

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
    use crate::propagators::AlldifferentArgs;

    #[test]
    fn hall_interval_pushes_lower_bound() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 2);
        let y = solver.new_variable(1, 2);
        let z = solver.new_variable(1, 3);

        let _ = solver
            .new_propagator(AlldiffArgs::new(vec![x, y, z]).expect("distinct variables"))
            .expect("no clash");

        assert_eq!(solver.fixed_value(z), Some(3));
        solver.assert_bounds(x, 1, 2);
    }

    #[test]
    fn hall_interval_pulls_upper_bound() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 3);
        let y = solver.new_variable(2, 3);
        let z = solver.new_variable(1, 3);

        let _ = solver
            .new_propagator(AlldiffArgs::new(vec![x, y, z]).expect("distinct variables"))
            .expect("no clash");

        assert_eq!(solver.fixed_value(z), Some(1));
    }

    #[test]
    fn value_based_alldifferent_misses_the_hall_interval() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 2);
        let y = solver.new_variable(1, 2);
        let z = solver.new_variable(1, 3);

        let _ = solver
            .new_propagator(AlldifferentArgs::new(vec![x, y, z]).expect("distinct variables"))
            .expect("no clash");

        solver.assert_bounds(z, 1, 3);
    }

    #[test]
    fn pigeonhole_is_detected_without_search() {
        let mut solver = TestSolver::default();
        let xs = (0..4).map(|_| solver.new_variable(0, 2)).collect::<Vec<_>>();

        let result = solver.new_propagator(AlldiffArgs::new(xs).expect("distinct variables"));

        assert!(result.is_err());
    }
}
