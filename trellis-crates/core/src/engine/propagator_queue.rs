use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::trellis_assert_moderate;

/// The propagators which still have to run before the store reaches a fixpoint.
///
/// Propagators are handed out by priority; a priority is only considered once every higher
/// priority is drained. A propagator is in the queue at most once.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u8>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue {
            queues: vec![VecDeque::new(); Priority::NUM_PRIORITIES],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        if self.is_propagator_enqueued(propagator_id) {
            return;
        }

        self.is_enqueued.accomodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;

        let queue = &mut self.queues[priority as usize];
        if queue.is_empty() {
            self.present_priorities.push(Reverse(priority as u8));
        }
        queue.push_back(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        trellis_assert_moderate!(!self.queues[top_priority].is_empty());

        let next_propagator_id = self.queues[top_priority].pop_front();

        if let Some(propagator_id) = next_propagator_id {
            self.is_enqueued[propagator_id] = false;
            self.num_enqueued -= 1;
        }

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        next_propagator_id
    }

    pub(crate) fn clear(&mut self) {
        for queue in self.queues.iter_mut() {
            queue.clear();
        }

        for is_propagator_enqueued in self.is_enqueued.iter_mut() {
            *is_propagator_enqueued = false;
        }

        self.present_priorities.clear();
        self.num_enqueued = 0;
    }

    /// Drops every scheduled propagator for which `keep` returns false.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(PropagatorId) -> bool) {
        for queue in self.queues.iter_mut() {
            queue.retain(|&propagator_id| {
                let kept = keep(propagator_id);
                if !kept {
                    self.is_enqueued[propagator_id] = false;
                    self.num_enqueued -= 1;
                }
                kept
            });
        }

        self.present_priorities = self
            .queues
            .iter()
            .enumerate()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(priority, _)| Reverse(priority as u8))
            .collect();
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}
