use enumset::EnumSet;

use super::IntDomainEvent;
use crate::engine::DomainId;
use crate::propagation::PropagatorId;

/// A narrowing which still has to be announced to the watchers of the variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DomainChange {
    pub(crate) domain_id: DomainId,
    pub(crate) events: EnumSet<IntDomainEvent>,
    /// The propagator which performed the narrowing, or `None` for search decisions.
    pub(crate) source: Option<PropagatorId>,
}

/// Collects the domain changes made by a propagator (or by the search) until the store notifies
/// the watchers of the changed variables.
#[derive(Default, Debug, Clone)]
pub(crate) struct EventSink {
    changes: Vec<DomainChange>,
}

impl EventSink {
    pub(crate) fn record(
        &mut self,
        domain_id: DomainId,
        events: EnumSet<IntDomainEvent>,
        source: Option<PropagatorId>,
    ) {
        if events.is_empty() {
            return;
        }

        self.changes.push(DomainChange {
            domain_id,
            events,
            source,
        });
    }

    pub(crate) fn take(&mut self) -> Vec<DomainChange> {
        std::mem::take(&mut self.changes)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.changes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn empty_event_sets_are_not_recorded() {
        let mut sink = EventSink::default();

        sink.record(DomainId::create_from_index(0), EnumSet::empty(), None);

        assert!(sink.is_empty());
    }

    #[test]
    fn taking_the_changes_empties_the_sink() {
        let mut sink = EventSink::default();
        let x = DomainId::create_from_index(0);

        sink.record(x, IntDomainEvent::LowerBound | IntDomainEvent::Removal, None);
        sink.record(x, EnumSet::only(IntDomainEvent::Removal), None);

        let changes = sink.take();
        assert_eq!(changes.len(), 2);
        assert!(changes[0].events.contains(IntDomainEvent::LowerBound));
        assert!(sink.is_empty());
    }
}
