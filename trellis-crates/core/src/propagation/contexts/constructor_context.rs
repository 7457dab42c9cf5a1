use crate::engine::Assignments;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::engine::TimeStamp;
use crate::engine::TimeStampValue;
use crate::engine::TrailedValues;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::PropagatorId;

/// What a propagator asked for while it was being constructed.
#[derive(Debug, Default)]
pub(crate) struct ImposeRequests {
    /// Do not subscribe the propagator to its arguments.
    pub(crate) skip_subscription: bool,
    pub(crate) remove_level_listener: bool,
    pub(crate) late_remove_level_listener: bool,
    /// Subscriptions on top of the ones derived from the arguments.
    pub(crate) watches: Vec<(DomainId, PruningEvent)>,
}

/// Handed to a [`PropagatorConstructor`](crate::propagation::PropagatorConstructor) when its
/// propagator is imposed on a store.
///
/// It gives read access to the domains and lets the propagator allocate [`TimeStamp`]s and
/// register for the hooks of the store.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
    pub(crate) propagator_id: PropagatorId,
    pub(crate) requests: &'a mut ImposeRequests,
    nested: bool,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        assignments: &'a Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
        requests: &'a mut ImposeRequests,
    ) -> Self {
        PropagatorConstructorContext {
            assignments,
            trailed_values,
            propagator_id,
            requests,
            nested: false,
        }
    }

    /// The context with which a meta constraint creates one of its children.
    ///
    /// Listener registrations of the child are made on behalf of the meta constraint, which
    /// forwards them; requests to skip the subscription are ignored because the meta constraint
    /// subscribes to the arguments of all of its children.
    pub fn nested(&mut self) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            assignments: self.assignments,
            trailed_values: self.trailed_values,
            propagator_id: self.propagator_id,
            requests: self.requests,
            nested: true,
        }
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    /// The level at which the propagator is imposed.
    pub fn level(&self) -> usize {
        self.assignments.level()
    }

    pub fn new_time_stamp<T: TimeStampValue>(&mut self, initial_value: T) -> TimeStamp<T> {
        TimeStamp::new(self.trailed_values.grow(initial_value.into_i64()))
    }

    /// The propagator manages its own subscriptions through
    /// [`PropagatorConstructorContext::watch`] and
    /// [`PropagationContext::watch`](crate::propagation::PropagationContext::watch) instead of
    /// being subscribed to every argument.
    pub fn will_not_register_any_events(&mut self) {
        if !self.nested {
            self.requests.skip_subscription = true;
        }
    }

    /// Subscribes the propagator to `var`. Ignored in a nested context.
    pub fn watch(&mut self, var: DomainId, pruning_event: PruningEvent) {
        if self.nested {
            return;
        }

        self.requests.watches.push((var, pruning_event));
    }

    /// Requests calls to [`Propagator::remove_level`].
    pub fn register_remove_level_listener(&mut self) {
        self.requests.remove_level_listener = true;
    }

    /// Requests calls to [`Propagator::synchronise`].
    pub fn register_late_remove_level_listener(&mut self) {
        self.requests.late_remove_level_listener = true;
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
