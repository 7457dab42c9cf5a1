use std::fmt::Display;

use crate::containers::StorageKey;

/// A handle to an integer variable of a [`Store`](crate::Store).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DomainId {
    id: u32,
}

impl DomainId {
    pub(crate) fn new(id: u32) -> Self {
        DomainId { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
