use super::forward_to_children;
use super::reified::agrees;
use super::reified::reify;
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
use crate::propagators::check_boolean;

/// The arguments of [`Xor`].
#[derive(Debug)]
pub struct XorArgs {
    child: Box<dyn NegatableConstructor>,
    b: DomainId,
}

impl XorArgs {
    pub fn new(child: impl NegatableConstructor + 'static, b: DomainId) -> Self {
        XorArgs {
            child: Box::new(child),
            b,
        }
    }
}

impl PropagatorConstructor for XorArgs {
    type PropagatorImpl = Xor;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Xor, ModelError> {
        check_boolean(context.domains(), self.b)?;

        Ok(Xor {
            child: MetaChild::create(self.child, &mut context)?,
            b: self.b,
        })
    }
}

/// Exactly one of "the constraint holds" and `b = 1` is true.
#[derive(Debug)]
pub struct Xor {
    child: MetaChild,
    b: DomainId,
}

impl MetaChildren for Xor {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![&mut self.child]
    }
}

impl Propagator for Xor {
    fn name(&self) -> &str {
        "Xor"
    }

    forward_to_children!(b);

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        reify(&mut self.child, self.b, context, false)?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.child, self.b, false)
    }
}

impl NegatablePropagator for Xor {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        reify(&mut self.child, self.b, context, true)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.child, self.b, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::Relation;
    use crate::propagators::XRelC;

    #[test]
    fn control_variable_is_the_opposite_of_the_status() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let b = solver.new_variable(0, 1);

        let handle = solver
            .new_propagator(XorArgs::new(XRelC::new(x, Relation::Eq, 5), b))
            .expect("non-empty domains");

        solver.remove(x, 5);
        solver.propagate().expect("b can be 1");

        assert_eq!(solver.fixed_value(b), Some(1));
        assert!(solver.satisfied(handle));
        assert!(!solver.not_satisfied(handle));
    }

    #[test]
    fn control_variable_one_violates_the_constraint() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let b = solver.new_variable(1, 1);

        let _ = solver
            .new_propagator(XorArgs::new(XRelC::new(x, Relation::Eq, 5), b))
            .expect("non-empty domains");

        assert!(!solver.contains(x, 5));
    }
}
