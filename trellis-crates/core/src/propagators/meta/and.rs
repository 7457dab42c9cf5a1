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

/// The arguments of [`And`].
#[derive(Debug)]
pub struct AndArgs {
    children: Vec<Box<dyn NegatableConstructor>>,
}

impl AndArgs {
    pub fn new(children: Vec<Box<dyn NegatableConstructor>>) -> Result<Self, ModelError> {
        if children.is_empty() {
            return Err(ModelError::IllegalArgument(
                "And needs at least one constraint".to_owned(),
            ));
        }

        Ok(AndArgs { children })
    }
}

impl PropagatorConstructor for AndArgs {
    type PropagatorImpl = And;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<And, ModelError> {
        Ok(And {
            children: MetaChild::create_all(self.children, &mut context)?,
        })
    }
}

/// All constraints hold.
#[derive(Debug)]
pub struct And {
    children: Vec<MetaChild>,
}

impl MetaChildren for And {
    fn children(&self) -> Vec<&MetaChild> {
        self.children.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut MetaChild> {
        self.children.iter_mut().collect()
    }
}

impl Propagator for And {
    fn name(&self) -> &str {
        "And"
    }

    forward_to_children!();

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        until_fixpoint(context, |context| {
            for child in &mut self.children {
                child.consistency(context)?;
            }
            Ok(())
        })?;

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.children.iter().all(|child| child.satisfied(domains))
    }
}

impl NegatablePropagator for And {
    /// At least one of the constraints is violated. Only prunes once all but one of them hold.
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let domains = context.domains();
        if self.children.iter().any(|child| child.not_satisfied(domains)) {
            return Ok(());
        }

        let open = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| !child.satisfied(domains))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        match open.as_slice() {
            [] => Err(Contradiction),
            &[index] => self.children[index].not_consistency(context),
            _ => Ok(()),
        }
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        self.children.iter().any(|child| child.not_satisfied(domains))
    }
}
