use super::forward_to_children;
use super::until_fixpoint;
use super::MetaChild;
use super::MetaChildren;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::NegatableConstructor;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;

/// The arguments of [`IfThenElse`].
#[derive(Debug)]
pub struct IfThenElseArgs {
    condition: Box<dyn NegatableConstructor>,
    consequence: Box<dyn NegatableConstructor>,
    alternative: Box<dyn NegatableConstructor>,
}

impl IfThenElseArgs {
    pub fn new(
        condition: impl NegatableConstructor + 'static,
        consequence: impl NegatableConstructor + 'static,
        alternative: impl NegatableConstructor + 'static,
    ) -> Self {
        IfThenElseArgs {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative: Box::new(alternative),
        }
    }
}

impl PropagatorConstructor for IfThenElseArgs {
    type PropagatorImpl = IfThenElse;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<IfThenElse, ModelError> {
        Ok(IfThenElse {
            condition: MetaChild::create(self.condition, &mut context)?,
            consequence: MetaChild::create(self.consequence, &mut context)?,
            alternative: MetaChild::create(self.alternative, &mut context)?,
        })
    }
}

/// The consequence holds if the condition does, and the alternative holds otherwise.
#[derive(Debug)]
pub struct IfThenElse {
    condition: MetaChild,
    consequence: MetaChild,
    alternative: MetaChild,
}

impl IfThenElse {
    /// Enforces the branch selected by the condition, or picks the condition when one of the
    /// branches is known. With `holds` unset the selected branch is enforced negated.
    fn select(&mut self, context: &mut PropagationContext, holds: bool) -> PropagationStatus {
        until_fixpoint(context, |context| {
            let consequence = self.consequence.status(context.domains());
            let alternative = self.alternative.status(context.domains());

            match (consequence, alternative) {
                (Some(first), Some(second)) if first != holds && second != holds => {
                    return Err(Contradiction)
                }
                (Some(first), _) if first != holds => self.condition.not_consistency(context)?,
                (_, Some(second)) if second != holds => self.condition.consistency(context)?,
                _ => {}
            }

            match self.condition.status(context.domains()) {
                Some(true) if holds => self.consequence.consistency(context),
                Some(true) => self.consequence.not_consistency(context),
                Some(false) if holds => self.alternative.consistency(context),
                Some(false) => self.alternative.not_consistency(context),
                None => Ok(()),
            }
        })
    }

    fn evaluates_to(&self, domains: Domains, holds: bool) -> bool {
        let condition = self.condition.status(domains);
        let consequence = self.consequence.status(domains);
        let alternative = self.alternative.status(domains);

        (condition == Some(true) && consequence == Some(holds))
            || (condition == Some(false) && alternative == Some(holds))
            || (consequence == Some(holds) && alternative == Some(holds))
    }
}

impl MetaChildren for IfThenElse {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.condition, &self.consequence, &self.alternative]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![
            &mut self.condition,
            &mut self.consequence,
            &mut self.alternative,
        ]
    }
}

impl Propagator for IfThenElse {
    fn name(&self) -> &str {
        "IfThenElse"
    }

    forward_to_children!();

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.select(context, true)?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.evaluates_to(domains, true)
    }
}

impl NegatablePropagator for IfThenElse {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.select(context, false)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.evaluates_to(domains, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::Relation;
    use crate::propagators::XRelC;

    fn if_x_positive_then_y_is_1_else_y_is_2(x: DomainId, y: DomainId) -> IfThenElseArgs {
        IfThenElseArgs::new(
            XRelC::new(x, Relation::Gt, 0),
            XRelC::new(y, Relation::Eq, 1),
            XRelC::new(y, Relation::Eq, 2),
        )
    }

    #[test]
    fn condition_selects_the_branch() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(-5, 5);
        let y = solver.new_variable(0, 5);

        let handle = solver
            .new_propagator(if_x_positive_then_y_is_1_else_y_is_2(x, y))
            .expect("non-empty domains");
        assert_eq!(solver.domain(y).size(), 6);

        solver.new_checkpoint();
        solver.set_upper_bound(x, 0);
        solver.propagate().expect("y can be 2");
        assert_eq!(solver.fixed_value(y), Some(2));
        assert!(solver.is_entailed(handle));

        solver.restore(0);
        solver.set_lower_bound(x, 1);
        solver.propagate().expect("y can be 1");
        assert_eq!(solver.fixed_value(y), Some(1));
    }

    #[test]
    fn violated_branch_decides_the_condition() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(-5, 5);
        let y = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(if_x_positive_then_y_is_1_else_y_is_2(x, y))
            .expect("non-empty domains");

        solver.remove(y, 2);
        solver.propagate().expect("x can be positive");

        solver.assert_bounds(x, 1, 5);
        assert_eq!(solver.fixed_value(y), Some(1));
    }

    #[test]
    fn both_branches_violated_is_a_contradiction() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(-5, 5);
        let y = solver.new_variable(3, 5);

        let result = solver.new_propagator(if_x_positive_then_y_is_1_else_y_is_2(x, y));

        assert!(result.is_err());
    }
}
