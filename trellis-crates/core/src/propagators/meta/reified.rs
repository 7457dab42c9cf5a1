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

/// The arguments of [`Reified`].
#[derive(Debug)]
pub struct ReifiedArgs {
    child: Box<dyn NegatableConstructor>,
    b: DomainId,
}

impl ReifiedArgs {
    pub fn new(child: impl NegatableConstructor + 'static, b: DomainId) -> Self {
        ReifiedArgs {
            child: Box::new(child),
            b,
        }
    }
}

impl PropagatorConstructor for ReifiedArgs {
    type PropagatorImpl = Reified;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Reified, ModelError> {
        check_boolean(context.domains(), self.b)?;

        Ok(Reified {
            child: MetaChild::create(self.child, &mut context)?,
            b: self.b,
        })
    }
}

/// `b = 1` exactly when the constraint holds.
#[derive(Debug)]
pub struct Reified {
    child: MetaChild,
    b: DomainId,
}

/// Links the 0/1 variable `b` to the status of `child`: with `equivalent` set, `b = 1` exactly
/// when the child holds, otherwise exactly when it is violated.
pub(super) fn reify(
    child: &mut MetaChild,
    b: DomainId,
    context: &mut PropagationContext,
    equivalent: bool,
) -> PropagationStatus {
    until_fixpoint(context, |context| match context.fixed_value(b) {
        Some(value) if (value == 1) == equivalent => child.consistency(context),
        Some(_) => child.not_consistency(context),
        None => {
            if let Some(holds) = child.status(context.domains()) {
                let _ = context.assign(b, i32::from(holds == equivalent))?;
            }
            Ok(())
        }
    })
}

/// Whether `b` and the status of `child` are both known and linked as described by [`reify`].
pub(super) fn agrees(domains: Domains, child: &MetaChild, b: DomainId, equivalent: bool) -> bool {
    match (domains.fixed_value(b), child.status(domains)) {
        (Some(value), Some(holds)) => (value == 1) == (holds == equivalent),
        _ => false,
    }
}

impl MetaChildren for Reified {
    fn children(&self) -> Vec<&MetaChild> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        vec![&mut self.child]
    }
}

impl Propagator for Reified {
    fn name(&self) -> &str {
        "Reified"
    }

    forward_to_children!(b);

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        reify(&mut self.child, self.b, context, true)?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.child, self.b, true)
    }
}

impl NegatablePropagator for Reified {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        reify(&mut self.child, self.b, context, false)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.child, self.b, false)
    }
}
