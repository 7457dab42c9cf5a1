use super::forward_to_children;
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

/// The arguments of [`Not`].
#[derive(Debug)]
pub struct NotArgs {
    child: Box<dyn NegatableConstructor>,
}

impl NotArgs {
    pub fn new(child: impl NegatableConstructor + 'static) -> Self {
        NotArgs {
            child: Box::new(child),
        }
    }
}

impl PropagatorConstructor for NotArgs {
    type PropagatorImpl = Not;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Not, ModelError> {
        Ok(Not {
            child: MetaChild::create(self.child, &mut context)?,
        })
    }
}

/// The negation of a constraint.
#[derive(Debug)]
pub struct Not {
    child: MetaChild,
}

impl MetaChildren for Not {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![&mut self.child]
    }
}

impl Propagator for Not {
    fn name(&self) -> &str {
        "Not"
    }

    forward_to_children!();

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.child.not_consistency(context)?;

        if self.child.not_satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.child.not_satisfied(domains)
    }
}

impl NegatablePropagator for Not {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.child.consistency(context)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.child.satisfied(domains)
    }
}
