use enumset::EnumSet;

use crate::engine::Assignments;
use crate::engine::DomainId;
use crate::engine::EmptyDomain;
use crate::engine::EventSink;
use crate::engine::IntDomainEvent;
use crate::engine::IntervalDomain;
use crate::engine::PruningEvent;
use crate::engine::TimeStamp;
use crate::engine::TrailedValues;
use crate::engine::WatchLists;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::PropagatorId;

/// The only point of communication between a propagator and the store while the propagator runs.
///
/// Domains are read through [`ReadDomains`](crate::propagation::ReadDomains). Every narrowing
/// operation returns `Ok(true)` if the domain shrank, `Ok(false)` if nothing changed, and
/// `Err(EmptyDomain)` (leaving the domain untouched) if the narrowing would empty the domain.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
    pub(crate) watch_lists: &'a mut WatchLists,
    pub(crate) events: &'a mut EventSink,
    pub(crate) propagator_id: PropagatorId,
    /// The entailment flag of the top-level propagator which is running.
    pub(crate) entailed: TimeStamp<bool>,
    nested: bool,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
        watch_lists: &'a mut WatchLists,
        events: &'a mut EventSink,
        propagator_id: PropagatorId,
        entailed: TimeStamp<bool>,
    ) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
            watch_lists,
            events,
            propagator_id,
            entailed,
            nested: false,
        }
    }

    /// The context in which a meta constraint runs one of its children.
    ///
    /// Narrowings behave as usual, but [`PropagationContext::remove_constraint`] and
    /// [`PropagationContext::detach`] are ignored: a child which is satisfied says nothing about
    /// its parent.
    pub fn nested(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
            trailed_values: self.trailed_values,
            watch_lists: self.watch_lists,
            events: self.events,
            propagator_id: self.propagator_id,
            entailed: self.entailed,
            nested: true,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Get the current domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    /// The current level of the store.
    pub fn level(&self) -> usize {
        self.assignments.level()
    }

    /// The number of narrowings performed on the store so far; comparing two readings tells
    /// whether anything was pruned in between.
    pub fn pruning_count(&self) -> u64 {
        self.assignments.num_prunings()
    }

    /// Marks the running constraint as entailed. It is not scheduled again until the store
    /// restores a level below the current one.
    pub fn remove_constraint(&mut self) {
        if self.nested {
            return;
        }

        self.entailed.write(self.trailed_values, true);
    }

    /// Stops notifications of changes to `var` for the running constraint until the store
    /// restores a level below the current one.
    ///
    /// Only call this once the value of `var` is fully accounted for by the constraint.
    pub fn detach(&mut self, var: DomainId) {
        if self.nested {
            return;
        }

        self.watch_lists
            .detach(var, self.propagator_id, self.trailed_values);
    }

    /// Subscribes the running propagator to `var`. Unlike [`PropagationContext::detach`], this
    /// is not undone on backtracking.
    ///
    /// Ignored in a nested context, where the meta constraint is subscribed to every argument of
    /// its children.
    pub fn watch(&mut self, var: DomainId, pruning_event: PruningEvent) {
        if self.nested {
            return;
        }

        self.watch_lists
            .watch(var, self.propagator_id, pruning_event, self.trailed_values);
    }

    /// Removes the subscription of the running propagator to `var`, permanently. Ignored in a
    /// nested context.
    pub fn unwatch(&mut self, var: DomainId) {
        if self.nested {
            return;
        }

        self.watch_lists.unwatch(var, self.propagator_id);
    }

    fn record(&mut self, var: DomainId, events: EnumSet<IntDomainEvent>) -> bool {
        let changed = !events.is_empty();
        self.events.record(var, events, Some(self.propagator_id));
        changed
    }

    pub fn set_lower_bound(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.set_lower_bound(var, value)?;
        Ok(self.record(var, events))
    }

    pub fn set_upper_bound(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.set_upper_bound(var, value)?;
        Ok(self.record(var, events))
    }

    /// Restricts `var` to `{min..max}`.
    pub fn set_bounds(&mut self, var: DomainId, min: i32, max: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.set_bounds(var, min, max)?;
        Ok(self.record(var, events))
    }

    pub fn intersect(&mut self, var: DomainId, domain: &IntervalDomain) -> Result<bool, EmptyDomain> {
        let events = self.assignments.intersect(var, domain)?;
        Ok(self.record(var, events))
    }

    /// Restricts `var` to `{v + shift | v in domain}`.
    pub fn intersect_shifted(
        &mut self,
        var: DomainId,
        domain: &IntervalDomain,
        shift: i32,
    ) -> Result<bool, EmptyDomain> {
        self.intersect(var, &domain.shifted(shift))
    }

    /// Removes every value of `domain` from `var`.
    pub fn subtract(&mut self, var: DomainId, domain: &IntervalDomain) -> Result<bool, EmptyDomain> {
        let events = self.assignments.subtract(var, domain)?;
        Ok(self.record(var, events))
    }

    pub fn remove(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.remove(var, value)?;
        Ok(self.record(var, events))
    }

    /// Removes `{min..max}` from `var`.
    pub fn remove_range(&mut self, var: DomainId, min: i32, max: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.remove_range(var, min, max)?;
        Ok(self.record(var, events))
    }

    pub fn assign(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.assign(var, value)?;
        Ok(self.record(var, events))
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
