//! Constraints which combine other constraints.
//!
//! The children of a meta constraint are [`NegatablePropagator`]s; depending on what is known
//! about the other children (through [`Propagator::satisfied`] and
//! [`NegatablePropagator::not_satisfied`]), a meta constraint enforces a child, enforces its
//! negation, or waits. Children run in a [nested](PropagationContext::nested) context, so they
//! cannot mark their parent as entailed.
//!
//! Every meta constraint is itself negatable, so they can be nested arbitrarily deep.
mod and;
mod eq;
mod if_then;
mod if_then_else;
mod implies;
mod not;
mod or;
mod reified;
mod xor;

pub use and::And;
pub use and::AndArgs;
pub use eq::Eq;
pub use eq::EqArgs;
pub use if_then::IfThen;
pub use if_then::IfThenArgs;
pub use if_then_else::IfThenElse;
pub use if_then_else::IfThenElseArgs;
pub use implies::Implies;
pub use implies::ImpliesArgs;
pub use not::Not;
pub use not::NotArgs;
pub use or::Or;
pub use or::OrArgs;
pub use reified::Reified;
pub use reified::ReifiedArgs;
pub use xor::Xor;
pub use xor::XorArgs;

use enumset::EnumSet;

use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::containers::HashSet;
use crate::engine::DomainId;
use crate::engine::IntDomainEvent;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::NegatableConstructor;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructorContext;

/// A child of a meta constraint together with its arguments.
#[derive(Debug)]
pub(crate) struct MetaChild {
    propagator: Box<dyn NegatablePropagator>,
    arguments: Vec<DomainId>,
}

impl MetaChild {
    pub(crate) fn create(
        constructor: Box<dyn NegatableConstructor>,
        context: &mut PropagatorConstructorContext,
    ) -> Result<MetaChild, ModelError> {
        let propagator = constructor.create_negatable(context.nested())?;
        let arguments = propagator.arguments();

        Ok(MetaChild {
            propagator,
            arguments,
        })
    }

    pub(crate) fn create_all(
        constructors: Vec<Box<dyn NegatableConstructor>>,
        context: &mut PropagatorConstructorContext,
    ) -> Result<Vec<MetaChild>, ModelError> {
        constructors
            .into_iter()
            .map(|constructor| MetaChild::create(constructor, context))
            .collect()
    }

    pub(crate) fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.propagator.consistency(&mut context.nested())
    }

    pub(crate) fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.propagator.not_consistency(&mut context.nested())
    }

    pub(crate) fn satisfied(&self, domains: Domains) -> bool {
        self.propagator.satisfied(domains)
    }

    pub(crate) fn not_satisfied(&self, domains: Domains) -> bool {
        self.propagator.not_satisfied(domains)
    }

    /// `Some(true)` if the child is satisfied, `Some(false)` if it is violated.
    pub(crate) fn status(&self, domains: Domains) -> Option<bool> {
        if self.satisfied(domains) {
            Some(true)
        } else if self.not_satisfied(domains) {
            Some(false)
        } else {
            None
        }
    }

    pub(crate) fn priority(&self) -> Priority {
        self.propagator.priority()
    }

    /// The event with which the parent has to watch `var` to run this child in both directions
    /// and to evaluate its status.
    fn pruning_event(&self, var: DomainId) -> Option<PruningEvent> {
        self.arguments.contains(&var).then(|| {
            self.propagator
                .nested_pruning_event(var, true)
                .join(self.propagator.nested_pruning_event(var, false))
        })
    }

    fn notify(&mut self, domains: Domains, var: DomainId, events: EnumSet<IntDomainEvent>) {
        if self.arguments.contains(&var) {
            let _ = self.propagator.notify(domains, var, events);
        }
    }

    fn remove_level(&mut self, level: usize) {
        self.propagator.remove_level(level);
    }

    fn synchronise(&mut self, domains: Domains) {
        self.propagator.synchronise(domains);
    }
}

/// The hooks of [`Propagator`] which a meta constraint hands down to all of its children.
pub(crate) trait MetaChildren {
    fn children(&self) -> Vec<&MetaChild>;

    fn children_mut(&mut self) -> Vec<&mut MetaChild>;

    /// The arguments of the children followed by `extra`, without duplicates.
    fn arguments_with(&self, extra: &[DomainId]) -> Vec<DomainId> {
        let mut seen: HashSet<_> = HashSet::default();

        self.children()
            .into_iter()
            .flat_map(|child| child.arguments.iter().copied())
            .chain(extra.iter().copied())
            .filter(|&var| seen.insert(var))
            .collect()
    }

    /// The join of the events the children need for `var`.
    fn joined_pruning_event(&self, var: DomainId) -> PruningEvent {
        self.children()
            .into_iter()
            .filter_map(|child| child.pruning_event(var))
            .fold(PruningEvent::Ground, PruningEvent::join)
    }

    /// The least urgent priority of the children.
    fn joined_priority(&self) -> Priority {
        self.children()
            .into_iter()
            .map(MetaChild::priority)
            .max()
            .unwrap_or_default()
    }

    fn notify_children(&mut self, domains: Domains, var: DomainId, events: EnumSet<IntDomainEvent>) {
        for child in self.children_mut() {
            child.notify(domains, var, events);
        }
    }

    fn remove_level_children(&mut self, level: usize) {
        for child in self.children_mut() {
            child.remove_level(level);
        }
    }

    fn synchronise_children(&mut self, domains: Domains) {
        for child in self.children_mut() {
            child.synchronise(domains);
        }
    }
}

/// Implements the parts of [`Propagator`] which every meta constraint forwards to its
/// children. `$extra` lists the fields holding the 0/1 control variables of the constraint.
macro_rules! forward_to_children {
    ($($extra:ident),*) => {
        fn arguments(&self) -> Vec<DomainId> {
            use crate::propagators::meta::MetaChildren;
            self.arguments_with(&[$(self.$extra),*])
        }

        fn priority(&self) -> Priority {
            use crate::propagators::meta::MetaChildren;
            self.joined_priority()
        }

        #[allow(unused_mut, reason = "only meta constraints with control variables join them")]
        fn consistency_pruning_event(&self, var: DomainId) -> PruningEvent {
            use crate::propagators::meta::MetaChildren;
            let mut event = self.joined_pruning_event(var);
            $(
                if var == self.$extra {
                    event = event.join(PruningEvent::Ground);
                }
            )*
            event
        }

        fn notify(
            &mut self,
            domains: Domains,
            var: DomainId,
            events: enumset::EnumSet<crate::engine::IntDomainEvent>,
        ) -> crate::propagation::EnqueueDecision {
            use crate::propagators::meta::MetaChildren;
            self.notify_children(domains, var, events);
            crate::propagation::EnqueueDecision::Enqueue
        }

        fn remove_level(&mut self, level: usize) {
            use crate::propagators::meta::MetaChildren;
            self.remove_level_children(level);
        }

        fn synchronise(&mut self, domains: Domains) {
            use crate::propagators::meta::MetaChildren;
            self.synchronise_children(domains);
        }
    };
}

use forward_to_children;

/// Repeats `body` until it stops narrowing domains.
fn until_fixpoint(
    context: &mut PropagationContext,
    mut body: impl FnMut(&mut PropagationContext) -> PropagationStatus,
) -> PropagationStatus {
    loop {
        let prunings = context.pruning_count();
        body(context)?;

        if context.pruning_count() == prunings {
            return Ok(());
        }
    }
}
