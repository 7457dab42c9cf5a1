use enumset::EnumSet;

use super::count_members;
use super::to_count;
use super::Tally;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntDomainEvent;
use crate::engine::IntervalDomain;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::propagators::check_distinct_variables;

/// The arguments of [`Among`].
#[derive(Clone, Debug)]
pub struct AmongArgs {
    xs: Vec<DomainId>,
    values: IntervalDomain,
    n: DomainId,
}

impl AmongArgs {
    /// Fails if a variable occurs more than once, counter included.
    pub fn new(xs: Vec<DomainId>, values: IntervalDomain, n: DomainId) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;
        if xs.contains(&n) {
            return Err(ModelError::IllegalArgument(format!(
                "the counter {n} is also one of the counted variables"
            )));
        }

        Ok(AmongArgs { xs, values, n })
    }
}

impl PropagatorConstructor for AmongArgs {
    type PropagatorImpl = Among;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Among, ModelError> {
        context.register_remove_level_listener();

        Ok(Among {
            changed: self.xs.clone(),
            tally: Tally::new(self.xs, self.values, &mut context),
            n: self.n,
        })
    }
}

/// `n` is the number of variables in the list which take a value from a set.
///
/// Only the variables which changed since the last call are classified again.
#[derive(Clone, Debug)]
pub struct Among {
    tally: Tally,
    n: DomainId,
    /// The variables which changed since the last call.
    changed: Vec<DomainId>,
}

impl Among {
    /// The variables which are known to take, or known not to take, a value from the set.
    pub fn settled(&self, domains: Domains) -> &[DomainId] {
        self.tally.settled(&domains)
    }
}

impl Propagator for Among {
    fn name(&self) -> &str {
        "Among"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.tally.variables().to_vec();
        arguments.push(self.n);
        arguments
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, var: DomainId) -> PruningEvent {
        if var == self.n {
            PruningEvent::Bound
        } else {
            PruningEvent::Any
        }
    }

    fn notify(
        &mut self,
        _domains: Domains,
        var: DomainId,
        _events: EnumSet<IntDomainEvent>,
    ) -> EnqueueDecision {
        if var != self.n {
            self.changed.push(var);
        }

        EnqueueDecision::Enqueue
    }

    fn remove_level(&mut self, _level: usize) {
        self.changed.clear();
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        // Positions are looked up when a variable is processed, as settling an earlier variable
        // may have moved it.
        let changed = std::mem::take(&mut self.changed);
        self.tally.update_variables(context, changed);

        let members = to_count(self.tally.members(context));
        let possible_members = to_count(self.tally.possible_members(context));
        let _ = context.set_bounds(self.n, members, possible_members)?;

        if members < possible_members {
            if context.lower_bound(self.n) == possible_members {
                self.tally.force_unsettled(context, true)?;
            } else if context.upper_bound(self.n) == members {
                self.tally.force_unsettled(context, false)?;
            }
        }

        if self.tally.is_complete(context) && context.is_fixed(self.n) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        let (members, possible_members) =
            count_members(domains, self.tally.variables(), self.tally.values());

        members == possible_members && domains.fixed_value(self.n) == Some(to_count(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn counter_is_bounded_by_the_classification() {
        let mut solver = TestSolver::default();
        let inside = solver.new_variable(1, 2);
        let outside = solver.new_variable(5, 6);
        let open = solver.new_variable(2, 5);
        let n = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(
                AmongArgs::new(vec![open, outside, inside], IntervalDomain::new(1, 3), n)
                    .expect("distinct variables"),
            )
            .expect("non-empty domains");

        solver.assert_bounds(n, 1, 2);
        let mut settled = solver.propagator(handle).settled(solver.store.domains()).to_vec();
        settled.sort();
        assert_eq!(settled, vec![inside, outside]);
    }

    #[test]
    fn counter_at_its_maximum_forces_the_open_variables_in() {
        let mut solver = TestSolver::default();
        let xs = vec![
            solver.new_variable(0, 5),
            solver.new_variable(0, 5),
            solver.new_variable(4, 5),
        ];
        let n = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(
                AmongArgs::new(xs.clone(), IntervalDomain::new(0, 1), n).expect("distinct"),
            )
            .expect("non-empty domains");
        solver.assert_bounds(n, 0, 2);

        solver.set_lower_bound(n, 2);
        solver.propagate().expect("both open variables can be at most 1");

        solver.assert_bounds(xs[0], 0, 1);
        solver.assert_bounds(xs[1], 0, 1);
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn counter_at_its_minimum_forces_the_open_variables_out() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 5), solver.new_variable(0, 5)];
        let n = solver.new_variable(0, 0);

        let _ = solver
            .new_propagator(
                AmongArgs::new(xs.clone(), IntervalDomain::from_values([1, 3]), n)
                    .expect("distinct"),
            )
            .expect("non-empty domains");

        assert_eq!(solver.domain(xs[0]).values().collect::<Vec<_>>(), vec![0, 2, 4, 5]);
        assert_eq!(solver.domain(xs[1]).values().collect::<Vec<_>>(), vec![0, 2, 4, 5]);
    }

    #[test]
    fn settled_prefix_tracks_backtracking() {
        let mut solver = TestSolver::default();
        let xs = (0..4).map(|_| solver.new_variable(0, 3)).collect::<Vec<_>>();
        let n = solver.new_variable(0, 4);

        let handle = solver
            .new_propagator(
                AmongArgs::new(xs.clone(), IntervalDomain::new(0, 1), n).expect("distinct"),
            )
            .expect("non-empty domains");
        assert!(solver.propagator(handle).settled(solver.store.domains()).is_empty());

        solver.new_checkpoint();
        solver.assign(xs[3], 0);
        solver.set_lower_bound(xs[1], 2);
        solver.propagate().expect("consistent");
        let mut settled = solver.propagator(handle).settled(solver.store.domains()).to_vec();
        settled.sort();
        assert_eq!(settled, vec![xs[1], xs[3]]);
        solver.assert_bounds(n, 1, 3);
        assert!(!solver.is_watching(xs[3], handle));

        solver.new_checkpoint();
        solver.set_upper_bound(xs[0], 1);
        solver.propagate().expect("consistent");
        assert_eq!(solver.propagator(handle).settled(solver.store.domains()).len(), 3);
        solver.assert_bounds(n, 2, 3);

        solver.restore(1);
        let mut settled = solver.propagator(handle).settled(solver.store.domains()).to_vec();
        settled.sort();
        assert_eq!(settled, vec![xs[1], xs[3]]);
        solver.assert_bounds(n, 1, 3);

        solver.restore(0);
        assert!(solver.propagator(handle).settled(solver.store.domains()).is_empty());
        assert!(solver.is_watching(xs[3], handle));

        solver.set_upper_bound(xs[2], 1);
        solver.propagate().expect("consistent");
        assert_eq!(
            solver.propagator(handle).settled(solver.store.domains()),
            &[xs[2]]
        );
        solver.assert_bounds(n, 1, 4);
    }

    #[test]
    fn counter_in_the_list_is_rejected() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let n = solver.new_variable(0, 5);

        assert!(AmongArgs::new(vec![x, n], IntervalDomain::new(0, 1), n).is_err());
    }
}
