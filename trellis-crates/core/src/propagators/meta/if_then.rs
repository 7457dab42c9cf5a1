use super::forward_to_children;
use super::until_fixpoint;
use super::MetaChild;
use super::MetaChildren;
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

/// The arguments of [`IfThen`].
#[derive(Debug)]
pub struct IfThenArgs {
    condition: Box<dyn NegatableConstructor>,
    consequence: Box<dyn NegatableConstructor>,
}

impl IfThenArgs {
    pub fn new(
        condition: impl NegatableConstructor + 'static,
        consequence: impl NegatableConstructor + 'static,
    ) -> Self {
        IfThenArgs {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
        }
    }
}

impl PropagatorConstructor for IfThenArgs {
    type PropagatorImpl = IfThen;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<IfThen, ModelError> {
        Ok(IfThen {
            condition: MetaChild::create(self.condition, &mut context)?,
            consequence: MetaChild::create(self.consequence, &mut context)?,
        })
    }
}

/// If the condition holds, so does the consequence.
#[derive(Debug)]
pub struct IfThen {
    condition: MetaChild,
    consequence: MetaChild,
}

impl MetaChildren for IfThen {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.condition, &self.consequence]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![&mut self.condition, &mut self.consequence]
    }
}

impl Propagator for IfThen {
    fn name(&self) -> &str {
        "IfThen"
    }

    forward_to_children!();

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        until_fixpoint(context, |context| {
            if self.condition.satisfied(context.domains()) {
                self.consequence.consistency(context)?;
            }
            if self.consequence.not_satisfied(context.domains()) {
                self.condition.not_consistency(context)?;
            }
            Ok(())
        })?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.condition.not_satisfied(domains) || self.consequence.satisfied(domains)
    }
}

impl NegatablePropagator for IfThen {
    /// The condition holds and the consequence does not.
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        until_fixpoint(context, |context| {
            self.condition.consistency(context)?;
            self.consequence.not_consistency(context)
        })
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.condition.satisfied(domains) && self.consequence.not_satisfied(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::Relation;
    use crate::propagators::XRelC;
    use crate::propagators::XRelY;

    #[test]
    fn consequence_follows_the_condition() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 10);
        let z = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(IfThenArgs::new(
                XRelC::new(x, Relation::Gt, 5),
                XRelY::new(y, Relation::Lt, z),
            ))
            .expect("non-empty domains");
        solver.assert_bounds(y, 0, 10);

        solver.set_lower_bound(x, 6);
        solver.propagate().expect("y < z is possible");

        solver.assert_bounds(y, 0, 9);
        solver.assert_bounds(z, 1, 10);
        assert!(!solver.is_entailed(handle));
    }

    #[test]
    fn violated_consequence_refutes_the_condition() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(IfThenArgs::new(
                XRelC::new(x, Relation::Gt, 5),
                XRelC::new(y, Relation::Eq, 3),
            ))
            .expect("non-empty domains");

        solver.remove(y, 3);
        solver.propagate().expect("x can be at most 5");

        solver.assert_bounds(x, 0, 5);
        assert!(solver.is_entailed(handle));
    }
}
