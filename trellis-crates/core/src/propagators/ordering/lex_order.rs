use std::cmp::Ordering;

use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The arguments of [`LexOrder`].
#[derive(Clone, Debug)]
pub struct LexOrderArgs {
    xs: Vec<DomainId>,
    ys: Vec<DomainId>,
    strict: bool,
}

impl LexOrderArgs {
    /// `xs <=lex ys`, or `xs <lex ys` if `strict` is set. Fails if the sequences differ in length.
    pub fn new(xs: Vec<DomainId>, ys: Vec<DomainId>, strict: bool) -> Result<Self, ModelError> {
        if xs.len() != ys.len() {
            return Err(ModelError::LengthMismatch {
                expected: xs.len(),
                actual: ys.len(),
            });
        }

        Ok(LexOrderArgs { xs, ys, strict })
    }
}

impl PropagatorConstructor for LexOrderArgs {
    type PropagatorImpl = LexOrder;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<LexOrder, ModelError> {
        context.register_late_remove_level_listener();

        let mut propagator = LexOrder {
            xs: self.xs,
            ys: self.ys,
            strict: self.strict,
            alpha: context.new_time_stamp(0),
            beta: 0,
        };
        propagator.beta = propagator.find_beta(&context, 0, propagator.no_beta());

        Ok(propagator)
    }
}

/// Lexicographic ordering of two sequences of variables.
///
/// Two positions are tracked:
/// * `alpha`, the first position whose pair of variables is not fixed to the same value. It only
///   moves forward within a branch and is kept in a [`TimeStamp`].
/// * `beta`, the first position from which the remainder of `xs` is certainly greater than the
///   remainder of `ys` (in the strict case, not smaller). Narrowing can only move it backward, so
///   it is refined incrementally and recomputed once the store restores an earlier level.
///
/// Only the pair at `alpha` has to be narrowed: `xs[alpha] <= ys[alpha]`, strictly when
/// `beta = alpha + 1`.
#[derive(Clone, Debug)]
pub struct LexOrder {
    xs: Vec<DomainId>,
    ys: Vec<DomainId>,
    strict: bool,
    alpha: TimeStamp<usize>,
    beta: usize,
}

impl LexOrder {
    /// The value of `beta` when no suffix is certainly out of order.
    fn no_beta(&self) -> usize {
        if self.strict {
            self.xs.len()
        } else {
            self.xs.len() + 1
        }
    }

    /// Scans from `from` for the first suffix which is certainly out of order, given that the
    /// suffix at `limit` is known to be (unless `limit` is past the end).
    fn find_beta(&self, domains: &impl HasAssignments, from: usize, limit: usize) -> usize {
        if from >= limit {
            return limit;
        }

        let end = limit.min(self.xs.len());
        // Start of the run of positions where `xs` is certainly not smaller than `ys`.
        let mut run = None;
        let mut index = from;

        while index < end {
            let x_min = domains.lower_bound(self.xs[index]);
            let y_max = domains.upper_bound(self.ys[index]);

            match x_min.cmp(&y_max) {
                Ordering::Greater => return run.unwrap_or(index),
                Ordering::Equal => {
                    let _ = run.get_or_insert(index);
                }
                Ordering::Less => run = None,
            }
            index += 1;
        }

        if index == self.xs.len() && !self.strict {
            self.no_beta()
        } else {
            run.unwrap_or(index)
        }
    }

    /// Moves `alpha` past the pairs fixed to the same value.
    fn advance_alpha(&self, context: &mut PropagationContext) -> usize {
        let mut alpha = self.alpha.value(context);

        while alpha < self.xs.len() {
            match (
                context.fixed_value(self.xs[alpha]),
                context.fixed_value(self.ys[alpha]),
            ) {
                (Some(x), Some(y)) if x == y => alpha += 1,
                _ => break,
            }
        }

        self.alpha.update(context, alpha);
        alpha
    }
}

impl Propagator for LexOrder {
    fn name(&self) -> &str {
        "LexOrder"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.xs.iter().chain(&self.ys).copied().collect()
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Bound
    }

    fn synchronise(&mut self, domains: Domains) {
        let alpha = self.alpha.value(&domains);
        self.beta = self.find_beta(&domains, alpha, self.no_beta());
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            let alpha = self.advance_alpha(context);
            self.beta = self.find_beta(context, alpha, self.beta);

            if alpha >= self.beta {
                return Err(Contradiction);
            }
            if alpha == self.xs.len() {
                context.remove_constraint();
                return Ok(());
            }

            let (x, y) = (self.xs[alpha], self.ys[alpha]);
            let (x_min, x_max) = (context.lower_bound(x), context.upper_bound(x));
            let (y_min, y_max) = (context.lower_bound(y), context.upper_bound(y));

            if x_max < y_min {
                context.remove_constraint();
                return Ok(());
            }

            let changed = if self.beta == alpha + 1 {
                let x_bound = y_max.checked_sub(1).ok_or(Contradiction)?;
                let y_bound = x_min.checked_add(1).ok_or(Contradiction)?;
                context.set_upper_bound(x, x_bound)? | context.set_lower_bound(y, y_bound)?
            } else {
                context.set_upper_bound(x, y_max)? | context.set_lower_bound(y, x_min)?
            };

            if !changed {
                return Ok(());
            }
        }
    }

    fn satisfied(&self, domains: Domains) -> bool {
        // Compare the largest values of `xs` with the smallest values of `ys`.
        let ordering = self
            .xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| domains.upper_bound(x).cmp(&domains.lower_bound(y)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal);

        match ordering {
            Ordering::Less => true,
            Ordering::Equal => !self.strict,
            Ordering::Greater => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn first_pair_is_ordered() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(2, 5), solver.new_variable(0, 9)];
        let ys = vec![solver.new_variable(0, 3), solver.new_variable(0, 9)];

        let _ = solver
            .new_propagator(LexOrderArgs::new(xs.clone(), ys.clone(), false).expect("same length"))
            .expect("consistent");

        solver.assert_bounds(xs[0], 2, 3);
        solver.assert_bounds(ys[0], 2, 3);
        solver.assert_bounds(xs[1], 0, 9);
    }

    #[test]
    fn a_greater_suffix_makes_the_first_pair_strict() {
        let mut solver = TestSolver::default();
        let xs = vec![
            solver.new_variable(0, 5),
            solver.new_variable(2, 2),
            solver.new_variable(3, 3),
        ];
        let ys = vec![
            solver.new_variable(0, 5),
            solver.new_variable(2, 2),
            solver.new_variable(1, 1),
        ];

        let _ = solver
            .new_propagator(LexOrderArgs::new(xs.clone(), ys.clone(), false).expect("same length"))
            .expect("consistent");

        solver.assert_bounds(xs[0], 0, 4);
        solver.assert_bounds(ys[0], 1, 5);
    }

    #[test]
    fn equal_sequences_violate_the_strict_order() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(1, 1), solver.new_variable(2, 2)];
        let ys = vec![solver.new_variable(1, 1), solver.new_variable(2, 2)];

        let strict = solver.new_propagator(
            LexOrderArgs::new(xs.clone(), ys.clone(), true).expect("same length"),
        );
        assert!(strict.is_err());

        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(1, 1), solver.new_variable(2, 2)];
        let ys = vec![solver.new_variable(1, 1), solver.new_variable(2, 2)];

        let handle = solver
            .new_propagator(LexOrderArgs::new(xs, ys, false).expect("same length"))
            .expect("consistent");
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn positions_are_recomputed_after_backtracking() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 1), solver.new_variable(0, 1)];
        let ys = vec![solver.new_variable(0, 1), solver.new_variable(0, 1)];

        let handle = solver
            .new_propagator(LexOrderArgs::new(xs.clone(), ys.clone(), true).expect("same length"))
            .expect("consistent");

        solver.new_checkpoint();
        solver.assign(xs[0], 1);
        solver.propagate().expect("consistent");
        assert_eq!(solver.fixed_value(ys[0]), Some(1));
        assert_eq!(solver.fixed_value(xs[1]), Some(0));
        assert_eq!(solver.fixed_value(ys[1]), Some(1));
        assert!(solver.is_entailed(handle));

        solver.restore(0);
        solver.assert_bounds(ys[0], 0, 1);
        solver.assert_bounds(xs[1], 0, 1);

        solver.assign(ys[0], 0);
        solver.propagate().expect("consistent");
        assert_eq!(solver.fixed_value(xs[0]), Some(0));
        assert_eq!(solver.fixed_value(xs[1]), Some(0));
        assert_eq!(solver.fixed_value(ys[1]), Some(1));
    }

    #[test]
    fn status_compares_the_extreme_sequences() {
        let mut solver = TestSolver::default();
        let xs = vec![solver.new_variable(0, 1), solver.new_variable(5, 6)];
        let ys = vec![solver.new_variable(1, 2), solver.new_variable(0, 9)];

        let constraint = LexOrderArgs::new(xs.clone(), ys, false).expect("same length");
        let propagator = solver
            .store
            .impose(constraint)
            .expect("valid model");

        assert!(!solver.propagator(propagator).satisfied(solver.store.domains()));

        solver.set_upper_bound(xs[0], 0);
        assert!(solver.propagator(propagator).satisfied(solver.store.domains()));
    }

    #[test]
    fn lengths_must_match() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 1);

        assert!(matches!(
            LexOrderArgs::new(vec![x], vec![], false),
            Err(ModelError::LengthMismatch { .. })
        ));
    }
}
