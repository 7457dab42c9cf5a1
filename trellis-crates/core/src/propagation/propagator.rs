use std::fmt::Debug;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSet;

use super::Domains;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::DomainId;
use crate::engine::IntDomainEvent;
use crate::engine::PruningEvent;
use crate::engine::VariableWeights;
#[cfg(doc)]
use crate::propagation::PropagatorConstructor;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Needed to hand out typed references to the propagators which the store keeps as
// `Box<dyn Propagator>`.
impl_downcast!(Propagator);

/// A constraint together with the algorithm which enforces it on the domains of its arguments.
///
/// The required functions are [`Propagator::name`], [`Propagator::arguments`],
/// [`Propagator::consistency`] and [`Propagator::satisfied`]; all other functions have default
/// implementations.
///
/// See the [`crate::propagation`] documentation for the lifecycle of a propagator.
pub trait Propagator: Downcast + Debug {
    /// The name of the constraint, e.g. `"XplusYeqZ"`. The store derives the identifier of an
    /// imposed constraint from it.
    fn name(&self) -> &str;

    /// The variables the constraint reads and narrows, in declaration order.
    fn arguments(&self) -> Vec<DomainId>;

    /// Removes values from the domains of the arguments which cannot be part of any solution of
    /// the constraint.
    ///
    /// The propagator has to run to its local fixpoint: when this function returns without a
    /// [`Contradiction`](crate::Contradiction), calling it again without any change to the
    /// domains in between narrows nothing. The `bool` returned by the narrowing operations of the
    /// [`PropagationContext`] tells whether another pass is needed.
    ///
    /// When the constraint is satisfied by every assignment of the current domains, it may call
    /// [`PropagationContext::remove_constraint`]; it will then not be called again until the
    /// store restores an earlier level.
    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus;

    /// Whether every assignment of the current domains satisfies the constraint.
    fn satisfied(&self, domains: Domains) -> bool;

    /// The least informative change to `var` after which [`Propagator::consistency`] has to run
    /// again.
    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Any
    }

    /// The priority with which the store schedules this propagator.
    ///
    /// By default the priority is [`Priority::VeryLow`]; cheap propagators should pick a higher
    /// priority.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Called when `var` changed in a way the propagator subscribed to. Returns whether the
    /// propagator should be scheduled.
    ///
    /// This is the place to record which arguments changed. It is never called for changes the
    /// propagator made itself.
    fn notify(
        &mut self,
        _domains: Domains,
        _var: DomainId,
        _events: EnumSet<IntDomainEvent>,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called before the store undoes `level`, if the propagator registered itself through
    /// [`PropagatorConstructorContext::register_remove_level_listener`].
    fn remove_level(&mut self, _level: usize) {}

    /// Called after the store restored an earlier level, if the propagator registered itself
    /// through [`PropagatorConstructorContext::register_late_remove_level_listener`].
    fn synchronise(&mut self, _domains: Domains) {}

    /// Called when [`Propagator::consistency`] failed and the store is configured to bump the
    /// weights of the variables involved.
    fn increase_weight(&self, weights: &mut VariableWeights) {
        for var in self.arguments() {
            weights.increase(var);
        }
    }

    /// A variable the search is advised to branch on next.
    fn guide_variable(&self, _domains: Domains) -> Option<DomainId> {
        None
    }

    /// The value the search is advised to try for [`Propagator::guide_variable`].
    fn guide_value(&self, _domains: Domains) -> Option<i32> {
        None
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro.
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// A propagator whose relation can also be enforced negated, which is what allows it to appear
/// inside meta constraints such as [`Or`](crate::propagators::Or) or
/// [`Reified`](crate::propagators::Reified).
pub trait NegatablePropagator: Propagator {
    /// Enforces the negation of the relation, with the same fixpoint contract as
    /// [`Propagator::consistency`].
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus;

    /// Whether no assignment of the current domains satisfies the constraint.
    fn not_satisfied(&self, domains: Domains) -> bool;

    /// The least informative change to `var` after which [`NegatablePropagator::not_consistency`]
    /// has to run again.
    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Any
    }

    /// The event with which a meta constraint has to watch `var` when it uses this propagator in
    /// the direction given by `consistency`.
    ///
    /// Meta constraints also rely on [`Propagator::satisfied`] and
    /// [`NegatablePropagator::not_satisfied`], so by default this covers both directions.
    fn nested_pruning_event(&self, var: DomainId, _consistency: bool) -> PruningEvent {
        self.consistency_pruning_event(var)
            .join(self.not_consistency_pruning_event(var))
    }
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// Propagators with high priority are propagated before propagators with low(er) priority. If two
/// propagators have the same priority, then the order in which they are propagated is unspecified.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_PRIORITIES: usize = 4;
}
