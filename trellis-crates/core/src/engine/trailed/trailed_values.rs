use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A reference to an integer cell in [`TrailedValues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

#[derive(Debug, Clone, Copy)]
struct TrailedChange {
    old_value: i64,
    reference: TrailedInteger,
}

/// Integer cells whose writes are undone when the store restores an earlier level.
///
/// Writes are recorded as `(cell, old value)` pairs on a single trail, which is replayed backwards
/// on synchronisation.
#[derive(Default, Debug, Clone)]
pub struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn new_level(&mut self) {
        self.trail.new_level()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub(crate) fn synchronise(&mut self, new_level: usize) {
        self.trail
            .synchronise(new_level)
            .for_each(|change| self.values[change.reference] = change.old_value)
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }

        // Nothing below the root can be restored, so root writes need no trail entry.
        if self.trail.level() > 0 {
            self.trail.push(TrailedChange {
                old_value,
                reference: trailed_integer,
            });
        }
        self.values[trailed_integer] = value;
    }
}
