use crate::basic_types::PropagationStatus;
use crate::containers::HashMap;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// Whether `x` takes a value of `values` for certain (`Some(true)`), never (`Some(false)`) or
/// possibly (`None`).
pub(crate) fn classify(domains: Domains, x: DomainId, values: &IntervalDomain) -> Option<bool> {
    let domain = domains.domain(x);

    if domain.is_subset_of(values) {
        Some(true)
    } else if !domain.is_intersecting(values) {
        Some(false)
    } else {
        None
    }
}

/// The number of variables of `xs` which certainly take a value of `values`, and the number which
/// possibly do.
pub(crate) fn count_members(
    domains: Domains,
    xs: &[DomainId],
    values: &IntervalDomain,
) -> (usize, usize) {
    xs.iter()
        .fold((0, 0), |(certain, possible), &x| match classify(domains, x, values) {
            Some(true) => (certain + 1, possible + 1),
            Some(false) => (certain, possible),
            None => (certain, possible + 1),
        })
}

/// Counts how many variables of a list take a value from a set.
///
/// Variables whose membership is decided are swapped into the settled prefix of the list and
/// detached; only the suffix is ever scanned again. Both the length of the prefix and the number
/// of members in it are restored on backtracking.
#[derive(Clone, Debug)]
pub(crate) struct Tally {
    xs: Vec<DomainId>,
    values: IntervalDomain,
    /// The current index of every variable in `xs`.
    positions: HashMap<DomainId, usize>,
    settled: TimeStamp<usize>,
    members: TimeStamp<usize>,
}

impl Tally {
    /// The variables of `xs` have to be distinct.
    pub(crate) fn new(
        xs: Vec<DomainId>,
        values: IntervalDomain,
        context: &mut PropagatorConstructorContext,
    ) -> Self {
        let positions = xs
            .iter()
            .enumerate()
            .map(|(index, &x)| (x, index))
            .collect();

        Tally {
            xs,
            values,
            positions,
            settled: context.new_time_stamp(0),
            members: context.new_time_stamp(0),
        }
    }

    pub(crate) fn variables(&self) -> &[DomainId] {
        &self.xs
    }

    pub(crate) fn values(&self) -> &IntervalDomain {
        &self.values
    }

    /// The variables whose membership is decided.
    pub(crate) fn settled(&self, domains: &impl HasAssignments) -> &[DomainId] {
        &self.xs[..self.settled.value(domains)]
    }

    /// The variables whose membership is open.
    pub(crate) fn unsettled(&self, domains: &impl HasAssignments) -> &[DomainId] {
        &self.xs[self.settled.value(domains)..]
    }

    /// The number of settled variables which take a value from the set.
    pub(crate) fn members(&self, domains: &impl HasAssignments) -> usize {
        self.members.value(domains)
    }

    /// The number of variables which may still take a value from the set.
    pub(crate) fn possible_members(&self, domains: &impl HasAssignments) -> usize {
        self.members(domains) + self.unsettled(domains).len()
    }

    pub(crate) fn is_complete(&self, domains: &impl HasAssignments) -> bool {
        self.settled.value(domains) == self.xs.len()
    }

    /// Settles every variable of the suffix whose membership is decided.
    pub(crate) fn update(&mut self, context: &mut PropagationContext) {
        // Settling swaps an open variable which was already visited into `index`.
        for index in self.settled.value(context)..self.xs.len() {
            let _ = self.try_settle(context, index);
        }
    }

    /// Settles the variables of `vars` whose membership is decided, looking up where they
    /// currently are in the list.
    pub(crate) fn update_variables(
        &mut self,
        context: &mut PropagationContext,
        vars: impl IntoIterator<Item = DomainId>,
    ) {
        for var in vars {
            let Some(&index) = self.positions.get(&var) else {
                continue;
            };

            if index >= self.settled.value(context) {
                let _ = self.try_settle(context, index);
            }
        }
    }

    /// Moves `xs[index]` into the settled prefix if its membership is decided.
    fn try_settle(&mut self, context: &mut PropagationContext, index: usize) -> bool {
        let var = self.xs[index];
        let Some(member) = classify(context.domains(), var, &self.values) else {
            return false;
        };

        let settled = self.settled.value(context);
        self.xs.swap(index, settled);
        let _ = self.positions.insert(self.xs[index], index);
        let _ = self.positions.insert(var, settled);

        self.settled.update(context, settled + 1);
        if member {
            let members = self.members.value(context);
            self.members.update(context, members + 1);
        }

        context.detach(var);
        true
    }

    /// Forces every open variable to take a value from the set (`member`) or to avoid the set,
    /// and settles them.
    pub(crate) fn force_unsettled(
        &mut self,
        context: &mut PropagationContext,
        member: bool,
    ) -> PropagationStatus {
        let settled = self.settled.value(context);
        for &x in &self.xs[settled..] {
            let _ = if member {
                context.intersect(x, &self.values)?
            } else {
                context.subtract(x, &self.values)?
            };
        }

        self.update(context);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;
    use itertools::Itertools;
    use rand::rngs::SmallRng;
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;
    use crate::basic_types::ModelError;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::IntDomainEvent;
    use crate::propagation::EnqueueDecision;
    use crate::propagation::Propagator;
    use crate::propagation::PropagatorConstructor;

    /// Keeps a tally up to date without pruning anything, either by rescanning the open suffix or
    /// by settling only the variables it was notified about.
    #[derive(Clone, Debug)]
    struct Tallied {
        xs: Vec<DomainId>,
        values: IntervalDomain,
        incremental: bool,
    }

    #[derive(Clone, Debug)]
    struct TalliedPropagator {
        tally: Tally,
        incremental: bool,
        changed: Vec<DomainId>,
    }

    impl PropagatorConstructor for Tallied {
        type PropagatorImpl = TalliedPropagator;

        fn create(
            self,
            mut context: PropagatorConstructorContext,
        ) -> Result<TalliedPropagator, ModelError> {
            context.register_remove_level_listener();

            Ok(TalliedPropagator {
                changed: self.xs.clone(),
                tally: Tally::new(self.xs, self.values, &mut context),
                incremental: self.incremental,
            })
        }
    }

    impl Propagator for TalliedPropagator {
        fn name(&self) -> &str {
            "Tallied"
        }

        fn arguments(&self) -> Vec<DomainId> {
            self.tally.variables().to_vec()
        }

        fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
            if self.incremental {
                let changed = std::mem::take(&mut self.changed);
                self.tally.update_variables(context, changed);
            } else {
                self.tally.update(context);
            }
            Ok(())
        }

        fn satisfied(&self, _domains: Domains) -> bool {
            false
        }

        fn notify(
            &mut self,
            _domains: Domains,
            var: DomainId,
            _events: EnumSet<IntDomainEvent>,
        ) -> EnqueueDecision {
            self.changed.push(var);
            EnqueueDecision::Enqueue
        }

        fn remove_level(&mut self, _level: usize) {
            self.changed.clear();
        }
    }

    /// Checks the bookkeeping of the tally against the domains of the store.
    fn check_tally(solver: &TestSolver, tally: &Tally, vars: &[DomainId], propagated: bool) {
        let domains = solver.store.domains();

        assert_eq!(
            tally.xs.iter().sorted().collect::<Vec<_>>(),
            vars.iter().sorted().collect::<Vec<_>>()
        );
        assert_eq!(tally.positions.len(), tally.xs.len());
        for (index, x) in tally.xs.iter().enumerate() {
            assert_eq!(tally.positions[x], index, "{x} is not where its position says");
        }

        for &x in tally.settled(&domains) {
            assert!(
                classify(domains, x, &tally.values).is_some(),
                "{x} is settled while open"
            );
        }
        if propagated {
            for &x in tally.unsettled(&domains) {
                assert!(
                    classify(domains, x, &tally.values).is_none(),
                    "{x} is decided but not settled"
                );
            }
        }

        let members = tally
            .settled(&domains)
            .iter()
            .filter(|&&x| classify(domains, x, &tally.values) == Some(true))
            .count();
        assert_eq!(tally.members(&domains), members);
    }

    fn check_random_steps(incremental: bool) {
        for seed in 0..30 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut solver = TestSolver::default();
            let vars = (0..6)
                .map(|_| solver.new_variable(0, 4))
                .collect::<Vec<_>>();
            let handle = solver
                .new_propagator(Tallied {
                    xs: vars.clone(),
                    values: IntervalDomain::new(1, 2),
                    incremental,
                })
                .expect("a tally never fails");

            for _ in 0..40 {
                let level = solver.store.level();
                if level > 0 && rng.gen_bool(0.3) {
                    solver.restore(rng.gen_range(0..level));
                    check_tally(&solver, &solver.propagator(handle).tally, &vars, false);
                    continue;
                }

                let var = vars[rng.gen_range(0..vars.len())];
                let values = solver.domain(var).values().collect::<Vec<_>>();
                let value = values[rng.gen_range(0..values.len())];

                solver.new_checkpoint();
                if values.len() > 1 && rng.gen_bool(0.6) {
                    solver.remove(var, value);
                } else {
                    solver.assign(var, value);
                }

                solver.propagate().expect("a tally never fails");
                check_tally(&solver, &solver.propagator(handle).tally, &vars, true);
            }
        }
    }

    #[test]
    fn rescanning_keeps_positions_and_members_in_sync_across_backtracking() {
        check_random_steps(false);
    }

    #[test]
    fn settling_notified_variables_keeps_positions_and_members_in_sync_across_backtracking() {
        check_random_steps(true);
    }

    #[test]
    fn membership_is_classified_by_domain() {
        let mut solver = TestSolver::default();
        let inside = solver.new_variable(2, 3);
        let outside = solver.new_sparse_variable(vec![0, 5]);
        let open = solver.new_variable(0, 2);
        let values = IntervalDomain::new(1, 4);

        let domains = solver.store.domains();
        assert_eq!(classify(domains, inside, &values), Some(true));
        assert_eq!(classify(domains, outside, &values), Some(false));
        assert_eq!(classify(domains, open, &values), None);
        assert_eq!(
            count_members(domains, &[inside, outside, open], &values),
            (1, 2)
        );
    }
}
