use super::PruningEvent;
use crate::containers::KeyedVec;
use crate::engine::DomainId;
use crate::engine::TimeStamp;
use crate::engine::TrailedValues;
use crate::propagation::PropagatorId;

/// A subscription of a propagator to the changes of one variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Watcher {
    pub(crate) propagator: PropagatorId,
    pub(crate) pruning_event: PruningEvent,
    /// Cleared when the propagator detaches from the variable; restored on backtracking.
    pub(crate) active: TimeStamp<bool>,
}

/// For every variable, the propagators which are woken up when the variable changes.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchLists {
    watchers: KeyedVec<DomainId, Vec<Watcher>>,
}

impl WatchLists {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Vec::new());
    }

    pub(crate) fn watchers(&self, domain_id: DomainId) -> &[Watcher] {
        &self.watchers[domain_id]
    }

    /// Subscribes `propagator` to `domain_id`. Watching a variable twice joins the pruning events.
    pub(crate) fn watch(
        &mut self,
        domain_id: DomainId,
        propagator: PropagatorId,
        pruning_event: PruningEvent,
        trailed_values: &mut TrailedValues,
    ) {
        let watchers = &mut self.watchers[domain_id];

        if let Some(watcher) = watchers
            .iter_mut()
            .find(|watcher| watcher.propagator == propagator)
        {
            watcher.pruning_event = watcher.pruning_event.join(pruning_event);
            watcher.active.write(trailed_values, true);
            return;
        }

        watchers.push(Watcher {
            propagator,
            pruning_event,
            active: TimeStamp::new(trailed_values.grow(1)),
        });
    }

    /// Removes the subscription of `propagator` to `domain_id`; this is not undone on
    /// backtracking.
    pub(crate) fn unwatch(&mut self, domain_id: DomainId, propagator: PropagatorId) {
        self.watchers[domain_id].retain(|watcher| watcher.propagator != propagator);
    }

    /// Deactivates the subscription of `propagator` to `domain_id` until the store restores a
    /// level at which it was still active.
    pub(crate) fn detach(
        &self,
        domain_id: DomainId,
        propagator: PropagatorId,
        trailed_values: &mut TrailedValues,
    ) {
        self.watchers[domain_id]
            .iter()
            .filter(|watcher| watcher.propagator == propagator)
            .for_each(|watcher| watcher.active.write(trailed_values, false));
    }

    pub(crate) fn is_watching(
        &self,
        domain_id: DomainId,
        propagator: PropagatorId,
        trailed_values: &TrailedValues,
    ) -> bool {
        self.watchers[domain_id]
            .iter()
            .any(|watcher| watcher.propagator == propagator && watcher.active.read(trailed_values))
    }
}
