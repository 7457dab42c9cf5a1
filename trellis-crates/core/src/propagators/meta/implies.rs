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
use crate::propagation::ReadDomains;
use crate::propagators::check_boolean;

/// The arguments of [`Implies`].
#[derive(Debug)]
pub struct ImpliesArgs {
    b: DomainId,
    child: Box<dyn NegatableConstructor>,
}

impl ImpliesArgs {
    pub fn new(b: DomainId, child: impl NegatableConstructor + 'static) -> Self {
        ImpliesArgs {
            b,
            child: Box::new(child),
        }
    }
}

impl PropagatorConstructor for ImpliesArgs {
    type PropagatorImpl = Implies;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Implies, ModelError> {
        check_boolean(context.domains(), self.b)?;

        Ok(Implies {
            b: self.b,
            child: MetaChild::create(self.child, &mut context)?,
        })
    }
}

/// `b = 1` implies that the constraint holds.
#[derive(Debug)]
pub struct Implies {
    b: DomainId,
    child: MetaChild,
}

impl MetaChildren for Implies {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![&mut self.child]
    }
}

impl Propagator for Implies {
    fn name(&self) -> &str {
        "Implies"
    }

    forward_to_children!(b);

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        until_fixpoint(context, |context| {
            if context.fixed_value(self.b) == Some(1) {
                self.child.consistency(context)?;
            }
            if self.child.not_satisfied(context.domains()) {
                let _ = context.assign(self.b, 0)?;
            }
            Ok(())
        })?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        domains.fixed_value(self.b) == Some(0) || self.child.satisfied(domains)
    }
}

impl NegatablePropagator for Implies {
    /// `b = 1` and the constraint is violated.
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let _ = context.assign(self.b, 1)?;
        self.child.not_consistency(context)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        domains.fixed_value(self.b) == Some(1) && self.child.not_satisfied(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::NotArgs;
    use crate::propagators::Relation;
    use crate::propagators::XRelC;

    #[test]
    fn control_variable_one_enforces_the_constraint() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let b = solver.new_variable(0, 1);

        let handle = solver
            .new_propagator(ImpliesArgs::new(b, XRelC::new(x, Relation::Ge, 4)))
            .expect("non-empty domains");
        solver.assert_bounds(x, 0, 10);

        solver.assign(b, 1);
        solver.propagate().expect("x can be at least 4");

        solver.assert_bounds(x, 4, 10);
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn violated_constraint_sets_the_control_variable_to_zero() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let b = solver.new_variable(0, 1);

        let _ = solver
            .new_propagator(ImpliesArgs::new(b, XRelC::new(x, Relation::Ge, 4)))
            .expect("non-empty domains");

        solver.set_upper_bound(x, 3);
        solver.propagate().expect("b can be 0");

        assert_eq!(solver.fixed_value(b), Some(0));
    }

    #[test]
    fn negation_sets_the_control_variable() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let b = solver.new_variable(0, 1);

        let _ = solver
            .new_propagator(NotArgs::new(ImpliesArgs::new(
                b,
                XRelC::new(x, Relation::Ge, 4),
            )))
            .expect("non-empty domains");

        assert_eq!(solver.fixed_value(b), Some(1));
        solver.assert_bounds(x, 0, 3);
    }
}
