use crate::engine::Assignments;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::engine::TrailedValues;

/// Access to the state of the store which every context exposes.
pub trait HasAssignments {
    #[doc(hidden)]
    fn assignments(&self) -> &Assignments;

    #[doc(hidden)]
    fn trailed_values(&self) -> &TrailedValues;
}

/// Read-only queries on the domains of variables.
pub trait ReadDomains: HasAssignments {
    fn domain(&self, var: DomainId) -> &IntervalDomain {
        self.assignments().domain(var)
    }

    fn lower_bound(&self, var: DomainId) -> i32 {
        self.domain(var).min()
    }

    fn upper_bound(&self, var: DomainId) -> i32 {
        self.domain(var).max()
    }

    fn size(&self, var: DomainId) -> u64 {
        self.domain(var).size()
    }

    fn contains(&self, var: DomainId, value: i32) -> bool {
        self.domain(var).contains(value)
    }

    fn is_fixed(&self, var: DomainId) -> bool {
        self.domain(var).is_singleton()
    }

    fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.domain(var).singleton_value()
    }
}

impl<T: HasAssignments> ReadDomains for T {}

/// A read-only view of the domains, handed to the pure parts of the propagator protocol.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed_values: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        Domains {
            assignments,
            trailed_values,
        }
    }

    /// The current level of the store.
    pub fn level(&self) -> usize {
        self.assignments.level()
    }
}

impl HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
