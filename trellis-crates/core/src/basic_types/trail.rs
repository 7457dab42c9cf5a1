use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::trellis_assert_simple;

/// A stack of undo entries partitioned by backtracking level.
///
/// Entries pushed while the trail is at level `l` are handed back (most recent first) when the
/// trail is synchronised to any level below `l`.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_level: usize,
    /// At index i is the position where the i-th level ends (exclusive) on the trail
    level_delimiters: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand so that `T` is not required to implement `Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_level: 0,
            level_delimiters: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_level(&mut self) {
        self.current_level += 1;
        self.level_delimiters.push(self.entries.len());
    }

    pub(crate) fn level(&self) -> usize {
        self.current_level
    }

    /// Removes every entry recorded above `new_level` and returns them in reverse order of
    /// insertion, which is the order in which they have to be undone.
    pub(crate) fn synchronise(&mut self, new_level: usize) -> Rev<Drain<'_, T>> {
        trellis_assert_simple!(new_level < self.current_level);

        let new_len = self.level_delimiters[new_level];

        self.current_level = new_level;
        self.level_delimiters.truncate(new_level);
        self.entries.drain(new_len..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_entries_are_observed_through_deref() {
        let mut trail = Trail::default();

        let expected = [1, 2, 3, 4];
        for &entry in expected.iter() {
            trail.push(entry);
        }

        assert_eq!(&expected, trail.deref());
    }

    #[test]
    fn synchronising_removes_entries_above_the_level() {
        let mut trail = Trail::default();

        trail.new_level();
        trail.push(1);
        let _ = trail.synchronise(0);

        assert!(trail.is_empty());
        assert_eq!(trail.level(), 0);
    }

    #[test]
    fn synchronising_can_skip_several_levels() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_level();
        trail.push(2);
        trail.new_level();
        trail.push(3);
        trail.new_level();
        trail.push(4);

        let _ = trail.synchronise(1);

        assert_eq!(&[1, 2], trail.deref());
    }

    #[test]
    fn removed_entries_are_returned_most_recent_first() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_level();
        trail.push(2);
        trail.new_level();
        trail.push(3);
        trail.new_level();
        trail.push(4);

        let popped = trail.synchronise(0).collect::<Vec<_>>();
        assert_eq!(vec![4, 3, 2], popped);
    }
}
