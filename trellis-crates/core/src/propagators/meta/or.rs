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

/// The arguments of [`Or`].
#[derive(Debug)]
pub struct OrArgs {
    children: Vec<Box<dyn NegatableConstructor>>,
}

impl OrArgs {
    pub fn new(children: Vec<Box<dyn NegatableConstructor>>) -> Result<Self, ModelError> {
        if children.is_empty() {
            return Err(ModelError::IllegalArgument(
                "Or needs at least one constraint".to_owned(),
            ));
        }

        Ok(OrArgs { children })
    }
}

impl PropagatorConstructor for OrArgs {
    type PropagatorImpl = Or;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Or, ModelError> {
        Ok(Or {
            children: MetaChild::create_all(self.children, &mut context)?,
        })
    }
}

/// At least one of the constraints holds.
///
/// Waits until all but one of the constraints are violated, and then enforces the remaining one.
#[derive(Debug)]
pub struct Or {
    children: Vec<MetaChild>,
}

impl MetaChildren for Or {
    fn children(&self) -> Vec<&MetaChild> {
        self.children.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        self.children.iter_mut().collect()
    }
}

impl Propagator for Or {
    fn name(&self) -> &str {
        "Or"
    }

    forward_to_children!();

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        if self.satisfied(context.domains()) {
            context.remove_constraint();
            return Ok(());
        }

        let domains = context.domains();
        let open = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| !child.not_satisfied(domains))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        match open.as_slice() {
            [] => Err(Contradiction),
            &[index] => {
                self.children[index].consistency(context)?;
                if self.children[index].satisfied(context.domains()) {
                    context.remove_constraint();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.children.iter().any(|child| child.satisfied(domains))
    }
}

impl NegatablePropagator for Or {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        until_fixpoint(context, |context| {
            for child in &mut self.children {
                child.not_consistency(context)?;
            }
            Ok(())
        })
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.children.iter().all(|child| child.not_satisfied(domains))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::Relation;
    use crate::propagators::XRelC;
    use crate::Store;

    /// Counts how often the wrapped constraint is enforced.
    #[derive(Clone, Debug)]
    struct Counting {
        inner: XRelC,
        calls: Rc<Cell<usize>>,
    }

    impl PropagatorConstructor for Counting {
        type PropagatorImpl = Counting;

        fn create(self, _context: PropagatorConstructorContext) -> Result<Counting, ModelError> {
            Ok(self)
        }
    }

    impl Propagator for Counting {
        fn name(&self) -> &str {
            "Counting"
        }

        fn arguments(&self) -> Vec<DomainId> {
            self.inner.arguments()
        }

        fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
            self.calls.set(self.calls.get() + 1);
            self.inner.consistency(context)
        }

        fn satisfied(&self, domains: Domains) -> bool {
            self.inner.satisfied(domains)
        }
    }

    impl NegatablePropagator for Counting {
        fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
            self.inner.not_consistency(context)
        }

        fn not_satisfied(&self, domains: Domains) -> bool {
            self.inner.not_satisfied(domains)
        }
    }

    #[test]
    fn remaining_child_is_enforced_once_per_call() {
        let mut store = Store::default();
        let x = store.new_variable(0, 3);
        let y = store.new_variable(0, 10);
        let calls = Rc::new(Cell::new(0));

        let or = OrArgs::new(vec![
            Box::new(XRelC::new(x, Relation::Eq, 1)),
            Box::new(Counting {
                inner: XRelC::new(y, Relation::Ge, 5),
                calls: Rc::clone(&calls),
            }),
        ])
        .expect("non-empty");
        let handle = store.impose(or).expect("valid model");
        store.consistency().expect("both children can hold");
        assert_eq!(calls.get(), 0);

        let _ = store.remove(x, 1).expect("x has other values");
        store.consistency().expect("y can be at least 5");

        assert_eq!(calls.get(), 1);
        assert_eq!(store.lower_bound(y), 5);
        assert!(store.is_entailed(handle));
    }

    #[test]
    fn all_children_violated_is_a_contradiction() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(
                OrArgs::new(vec![
                    Box::new(XRelC::new(x, Relation::Eq, 1)),
                    Box::new(XRelC::new(y, Relation::Ge, 5)),
                ])
                .expect("non-empty"),
            )
            .expect("both children can hold");

        solver.assign(x, 0);
        solver.set_upper_bound(y, 4);

        assert!(solver.propagate().is_err());
    }

    #[test]
    fn negation_violates_every_child() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(crate::propagators::NotArgs::new(
                OrArgs::new(vec![
                    Box::new(XRelC::new(x, Relation::Eq, 1)),
                    Box::new(XRelC::new(y, Relation::Ge, 5)),
                ])
                .expect("non-empty"),
            ))
            .expect("both children can be violated");

        assert!(!solver.contains(x, 1));
        solver.assert_bounds(y, 0, 4);
    }
}
