use super::check_booleans;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The arguments of [`BoolClause`].
#[derive(Clone, Debug)]
pub struct BoolClauseArgs {
    positive: Vec<DomainId>,
    negative: Vec<DomainId>,
}

impl BoolClauseArgs {
    /// Fails if the clause has no literals.
    pub fn new(positive: Vec<DomainId>, negative: Vec<DomainId>) -> Result<Self, ModelError> {
        if positive.is_empty() && negative.is_empty() {
            return Err(ModelError::IllegalArgument(
                "a clause needs at least one literal".to_owned(),
            ));
        }

        Ok(BoolClauseArgs { positive, negative })
    }
}

impl PropagatorConstructor for BoolClauseArgs {
    type PropagatorImpl = BoolClause;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<BoolClause, ModelError> {
        check_booleans(
            context.domains(),
            self.positive.iter().chain(self.negative.iter()),
        )?;

        let literals = self
            .positive
            .into_iter()
            .map(|x| Literal { var: x, truth: 1 })
            .chain(self.negative.into_iter().map(|y| Literal { var: y, truth: 0 }))
            .collect();

        Ok(BoolClause {
            literals,
            falsified: context.new_time_stamp(0),
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct Literal {
    var: DomainId,
    /// The value of `var` which makes the literal true.
    truth: i32,
}

/// `x_1 or ... or x_n or not y_1 or ... or not y_m`.
///
/// The falsified literals are kept in a prefix; when a single literal remains after it, that
/// literal is made true.
#[derive(Clone, Debug)]
pub struct BoolClause {
    literals: Vec<Literal>,
    falsified: TimeStamp<usize>,
}

impl Propagator for BoolClause {
    fn name(&self) -> &str {
        "BoolClause"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.literals.iter().map(|literal| literal.var).collect()
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let mut falsified = self.falsified.value(context);

        for index in falsified..self.literals.len() {
            let literal = self.literals[index];
            match context.fixed_value(literal.var) {
                Some(value) if value == literal.truth => {
                    self.falsified.update(context, falsified);
                    context.remove_constraint();
                    return Ok(());
                }
                Some(_) => {
                    self.literals.swap(index, falsified);
                    context.detach(literal.var);
                    falsified += 1;
                }
                None => {}
            }
        }

        self.falsified.update(context, falsified);

        match self.literals.len() - falsified {
            0 => Err(Contradiction),
            1 => {
                let literal = self.literals[falsified];
                let _ = context.assign(literal.var, literal.truth)?;
                context.remove_constraint();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.literals
            .iter()
            .any(|literal| domains.fixed_value(literal.var) == Some(literal.truth))
    }
}

impl NegatablePropagator for BoolClause {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        for literal in &self.literals {
            let _ = context.assign(literal.var, 1 - literal.truth)?;
        }

        context.remove_constraint();
        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.literals.iter().all(|literal| {
            domains
                .fixed_value(literal.var)
                .is_some_and(|value| value != literal.truth)
        })
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
    fn last_literal_is_made_true() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 1);
        let y = solver.new_variable(0, 1);
        let z = solver.new_variable(0, 1);

        let handle = solver
            .new_propagator(BoolClauseArgs::new(vec![x, y], vec![z]).expect("non-empty clause"))
            .expect("consistent");

        solver.assign(x, 0);
        solver.assign(z, 1);
        solver.propagate().expect("consistent");

        assert_eq!(solver.fixed_value(y), Some(1));
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn a_true_literal_entails_the_clause() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 1);
        let y = solver.new_variable(0, 0);

        let handle = solver
            .new_propagator(BoolClauseArgs::new(vec![x], vec![y]).expect("non-empty clause"))
            .expect("consistent");

        assert!(solver.is_entailed(handle));
        assert!(!solver.is_fixed(x));
    }

    #[test]
    fn falsified_prefix_survives_backtracking() {
        let mut solver = TestSolver::default();
        let xs = vec![
            solver.new_variable(0, 1),
            solver.new_variable(0, 1),
            solver.new_variable(0, 1),
        ];

        let handle = solver
            .new_propagator(BoolClauseArgs::new(xs.clone(), vec![]).expect("non-empty clause"))
            .expect("consistent");

        solver.assign(xs[0], 0);
        solver.propagate().expect("consistent");

        solver.new_checkpoint();
        solver.assign(xs[2], 0);
        solver.propagate().expect("consistent");
        assert_eq!(solver.fixed_value(xs[1]), Some(1));

        solver.restore(0);
        assert!(!solver.is_fixed(xs[1]));
        assert!(!solver.is_watching(xs[0], handle));
        assert!(solver.is_watching(xs[2], handle));

        solver.assign(xs[1], 0);
        solver.propagate().expect("consistent");
        assert_eq!(solver.fixed_value(xs[2]), Some(1));
    }

    #[test]
    fn empty_clauses_are_rejected() {
        assert!(matches!(
            BoolClauseArgs::new(vec![], vec![]),
            Err(ModelError::IllegalArgument(_))
        ));
    }
}
