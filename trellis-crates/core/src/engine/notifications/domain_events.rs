use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::engine::IntervalDomain;

/// The kinds of change a narrowing can make to the domain of a variable.
#[derive(Debug, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The domain became a singleton.
    Assign,
    LowerBound,
    UpperBound,
    /// At least one value was removed.
    Removal,
}

impl IntDomainEvent {
    /// The events describing the change from `old` to `new`, where `new` is a subset of `old`.
    pub(crate) fn between(old: &IntervalDomain, new: &IntervalDomain) -> EnumSet<IntDomainEvent> {
        let mut events = EnumSet::new();
        if old.size() == new.size() {
            return events;
        }

        events |= IntDomainEvent::Removal;
        if new.min() > old.min() {
            events |= IntDomainEvent::LowerBound;
        }
        if new.max() < old.max() {
            events |= IntDomainEvent::UpperBound;
        }
        if new.is_singleton() {
            events |= IntDomainEvent::Assign;
        }

        events
    }
}

/// The granularity of domain changes a constraint wants to be woken up for.
///
/// The variants are ordered by how much information they carry: a constraint which needs
/// [`PruningEvent::Bound`] events also has to see every [`PruningEvent::Ground`] event.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PruningEvent {
    /// The variable became fixed.
    Ground,
    /// A bound of the variable changed.
    Bound,
    /// Any value was removed.
    #[default]
    Any,
}

impl PruningEvent {
    /// The least event which is at least as fine-grained as both `self` and `other`.
    pub fn join(self, other: PruningEvent) -> PruningEvent {
        self.max(other)
    }

    pub(crate) fn triggering_events(self) -> EnumSet<IntDomainEvent> {
        match self {
            PruningEvent::Ground => enum_set!(IntDomainEvent::Assign),
            PruningEvent::Bound => enum_set!(
                IntDomainEvent::Assign | IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
            ),
            PruningEvent::Any => EnumSet::all(),
        }
    }

    pub(crate) fn is_triggered_by(self, events: EnumSet<IntDomainEvent>) -> bool {
        !self.triggering_events().is_disjoint(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_describe_the_narrowing() {
        let old = IntervalDomain::new(1, 5);

        assert_eq!(
            IntDomainEvent::between(&old, &IntervalDomain::new(2, 5)),
            IntDomainEvent::LowerBound | IntDomainEvent::Removal
        );
        assert_eq!(
            IntDomainEvent::between(&old, &old.subtract_value(3)),
            enum_set!(IntDomainEvent::Removal)
        );
        assert_eq!(
            IntDomainEvent::between(&old, &IntervalDomain::singleton(5)),
            IntDomainEvent::LowerBound | IntDomainEvent::Removal | IntDomainEvent::Assign
        );
        assert!(IntDomainEvent::between(&old, &old).is_empty());
    }

    #[test]
    fn join_takes_the_finest_event() {
        assert_eq!(PruningEvent::Ground.join(PruningEvent::Bound), PruningEvent::Bound);
        assert_eq!(PruningEvent::Any.join(PruningEvent::Ground), PruningEvent::Any);
        assert_eq!(PruningEvent::Ground.join(PruningEvent::Ground), PruningEvent::Ground);
    }

    #[test]
    fn coarse_events_ignore_interior_removals() {
        let removal = enum_set!(IntDomainEvent::Removal);

        assert!(!PruningEvent::Ground.is_triggered_by(removal));
        assert!(!PruningEvent::Bound.is_triggered_by(removal));
        assert!(PruningEvent::Any.is_triggered_by(removal));
        assert!(PruningEvent::Ground
            .is_triggered_by(IntDomainEvent::Assign | IntDomainEvent::Removal));
    }
}
