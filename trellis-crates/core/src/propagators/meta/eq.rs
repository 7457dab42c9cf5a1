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

/// The arguments of [`Eq`].
#[derive(Debug)]
pub struct EqArgs {
    left: Box<dyn NegatableConstructor>,
    right: Box<dyn NegatableConstructor>,
}

impl EqArgs {
    pub fn new(
        left: impl NegatableConstructor + 'static,
        right: impl NegatableConstructor + 'static,
    ) -> Self {
        EqArgs {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl PropagatorConstructor for EqArgs {
    type PropagatorImpl = Eq;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Eq, ModelError> {
        Ok(Eq {
            left: MetaChild::create(self.left, &mut context)?,
            right: MetaChild::create(self.right, &mut context)?,
        })
    }
}

/// Two constraints are equivalent: either both hold or neither does.
#[derive(Debug)]
pub struct Eq {
    left: MetaChild,
    right: MetaChild,
}

impl Eq {
    /// Makes each side agree with the other once the status of the other is known. With
    /// `equivalent` unset, makes them disagree instead.
    fn align(&mut self, context: &mut PropagationContext, equivalent: bool) -> PropagationStatus {
        until_fixpoint(context, |context| {
            follow(&self.left, &mut self.right, context, equivalent)?;
            follow(&self.right, &mut self.left, context, equivalent)
        })
    }
}

fn follow(
    known: &MetaChild,
    other: &mut MetaChild,
    context: &mut PropagationContext,
    equivalent: bool,
) -> PropagationStatus {
    match known.status(context.domains()) {
        Some(holds) if holds == equivalent => other.consistency(context),
        Some(_) => other.not_consistency(context),
        None => Ok(()),
    }
}

impl MetaChildren for Eq {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.left, &self.right]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![&mut self.left, &mut self.right]
    }
}

impl Propagator for Eq {
    fn name(&self) -> &str {
        "Eq"
    }

    forward_to_children!();

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.align(context, true)?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        (self.left.satisfied(domains) && self.right.satisfied(domains))
            || (self.left.not_satisfied(domains) && self.right.not_satisfied(domains))
    }
}

impl NegatablePropagator for Eq {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.align(context, false)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        (self.left.satisfied(domains) && self.right.not_satisfied(domains))
            || (self.left.not_satisfied(domains) && self.right.satisfied(domains))
    }
}
