use enumset::EnumSet;

use super::Literal;
use super::WatchSet;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntDomainEvent;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::propagators::check_distinct_variables;

/// The arguments of [`Nogood`].
#[derive(Clone, Debug)]
pub struct NogoodArgs {
    literals: Vec<Literal>,
}

impl NogoodArgs {
    /// The assignments `var = value` which must not all hold. Fails if there are none, or if a
    /// variable occurs more than once.
    pub fn new(assignments: Vec<(DomainId, i32)>) -> Result<Self, ModelError> {
        if assignments.is_empty() {
            return Err(ModelError::IllegalArgument(
                "a nogood needs at least one assignment".to_owned(),
            ));
        }

        let vars = assignments.iter().map(|&(var, _)| var).collect::<Vec<_>>();
        check_distinct_variables(&vars)?;

        Ok(NogoodArgs {
            literals: assignments
                .into_iter()
                .map(|(var, value)| Literal { var, value })
                .collect(),
        })
    }
}

impl PropagatorConstructor for NogoodArgs {
    type PropagatorImpl = Nogood;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Nogood, ModelError> {
        Ok(Nogood {
            literals: WatchSet::new(self.literals, &mut context),
        })
    }
}

/// Not all of `x_1 = v_1, ..., x_n = v_n`.
///
/// Only two literals which are not true are watched. When a watched literal becomes true and no
/// other literal can take over its watch, the remaining watched literal is made false.
#[derive(Clone, Debug)]
pub struct Nogood {
    literals: WatchSet,
}

impl Propagator for Nogood {
    fn name(&self) -> &str {
        "Nogood"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.literals
            .literals()
            .iter()
            .map(|literal| literal.var)
            .collect()
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn notify(
        &mut self,
        _domains: Domains,
        var: DomainId,
        _events: EnumSet<IntDomainEvent>,
    ) -> EnqueueDecision {
        // A meta constraint forwards changes to any of the variables.
        if self.literals.watched().iter().any(|literal| literal.var == var) {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        if let [literal] = self.literals.literals() {
            let _ = context.remove(literal.var, literal.value)?;
            context.remove_constraint();
            return Ok(());
        }

        for slot in 0..2 {
            let literal = self.literals.watched()[slot];
            if literal.is_false(context) {
                context.remove_constraint();
                return Ok(());
            }
            if !literal.is_true(context) {
                continue;
            }

            if self.literals.rearm(context, slot) {
                if self.literals.watched()[slot].is_false(context) {
                    context.remove_constraint();
                    return Ok(());
                }
            } else {
                // Every literal but the other watched one is true.
                let other = self.literals.watched()[1 - slot];
                let _ = context.remove(other.var, other.value)?;
                context.remove_constraint();
                return Ok(());
            }
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.literals
            .literals()
            .iter()
            .any(|literal| literal.is_false(&domains))
    }

    fn guide_variable(&self, domains: Domains) -> Option<DomainId> {
        self.literals
            .watched()
            .iter()
            .find(|literal| !domains.is_fixed(literal.var))
            .map(|literal| literal.var)
    }

    /// A value which falsifies the literal of [`Propagator::guide_variable`].
    fn guide_value(&self, domains: Domains) -> Option<i32> {
        let literal = self
            .literals
            .watched()
            .iter()
            .find(|literal| !domains.is_fixed(literal.var))?;

        domains
            .domain(literal.var)
            .values()
            .find(|&value| value != literal.value)
    }
}

impl NegatablePropagator for Nogood {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        for literal in self.literals.literals() {
            let _ = context.assign(literal.var, literal.value)?;
        }

        context.remove_constraint();
        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.literals
            .literals()
            .iter()
            .all(|literal| literal.is_true(&domains))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    fn nogood(assignments: Vec<(DomainId, i32)>) -> NogoodArgs {
        NogoodArgs::new(assignments).expect("valid nogood")
    }

    #[test]
    fn last_open_literal_is_falsified() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 3);
        let z = solver.new_variable(0, 3);

        let handle = solver
            .new_propagator(nogood(vec![(x, 1), (y, 2), (z, 3)]))
            .expect("consistent");

        solver.assign(x, 1);
        solver.propagate().expect("consistent");
        assert!(solver.contains(z, 3));

        solver.assign(y, 2);
        solver.propagate().expect("consistent");
        assert!(!solver.contains(z, 3));
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn only_two_variables_are_watched() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 3);
        let z = solver.new_variable(0, 3);

        let handle = solver
            .new_propagator(nogood(vec![(x, 1), (y, 2), (z, 3)]))
            .expect("consistent");
        assert!(solver.is_watching(x, handle));
        assert!(solver.is_watching(y, handle));
        assert!(!solver.is_watching(z, handle));

        solver.assign(x, 1);
        solver.propagate().expect("consistent");
        assert!(!solver.is_watching(x, handle));
        assert!(solver.is_watching(z, handle));
    }

    #[test]
    fn watches_stay_valid_after_backtracking() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 3);
        let z = solver.new_variable(0, 3);

        let _ = solver
            .new_propagator(nogood(vec![(x, 1), (y, 2), (z, 3)]))
            .expect("consistent");

        solver.new_checkpoint();
        solver.assign(x, 1);
        solver.assign(z, 3);
        solver.propagate().expect("consistent");
        assert!(!solver.contains(y, 2));

        solver.restore(0);
        assert!(solver.contains(y, 2));

        solver.assign(y, 2);
        solver.assign(z, 3);
        solver.propagate().expect("consistent");
        assert!(!solver.contains(x, 1));
    }

    #[test]
    fn a_fully_true_nogood_fails() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 1);
        let y = solver.new_variable(2, 2);

        let result = solver.new_propagator(nogood(vec![(x, 1), (y, 2)]));

        assert!(result.is_err());
    }

    #[test]
    fn guide_points_at_a_falsifying_value() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 1);
        let y = solver.new_variable(0, 3);
        let z = solver.new_variable(0, 3);

        let handle = solver
            .new_propagator(nogood(vec![(x, 1), (y, 0), (z, 3)]))
            .expect("consistent");

        let propagator = solver.propagator(handle);
        let domains = solver.store.domains();
        let var = propagator.guide_variable(domains).expect("an open literal");
        let value = propagator.guide_value(domains).expect("an open literal");

        assert!(var == y || var == z);
        assert!(solver.contains(var, value));
        assert!(!(var == y && value == 0) && !(var == z && value == 3));
    }

    #[test]
    fn invalid_nogoods_are_rejected() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);

        assert!(NogoodArgs::new(vec![]).is_err());
        assert!(NogoodArgs::new(vec![(x, 1), (x, 2)]).is_err());
    }
}
