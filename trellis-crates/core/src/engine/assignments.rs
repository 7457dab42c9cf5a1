use enumset::EnumSet;

use super::DomainId;
use super::IntDomainEvent;
use super::IntervalDomain;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::trellis_assert_moderate;
use crate::trellis_assert_simple;

/// Narrowing a domain would leave it without values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmptyDomain;

/// The domain a variable had before it was first narrowed at some level.
#[derive(Clone, Debug)]
struct DomainSnapshot {
    domain_id: DomainId,
    domain: IntervalDomain,
    saved_at: usize,
}

/// The current domain of every variable, together with the snapshots needed to restore earlier
/// levels.
///
/// A variable is snapshotted at most once per level: the first narrowing at a level stores the
/// domain as it was when that level was entered.
#[derive(Clone, Debug, Default)]
pub struct Assignments {
    domains: KeyedVec<DomainId, IntervalDomain>,
    /// The last level at which the domain of a variable was snapshotted.
    saved_at: KeyedVec<DomainId, usize>,
    trail: Trail<DomainSnapshot>,
    num_prunings: u64,
}

impl Assignments {
    pub(crate) fn grow(&mut self, domain: IntervalDomain) -> DomainId {
        trellis_assert_simple!(!domain.is_empty(), "a variable cannot start with an empty domain");

        let _ = self.saved_at.push(0);
        self.domains.push(domain)
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn domain_ids(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub(crate) fn level(&self) -> usize {
        self.trail.level()
    }

    pub(crate) fn new_level(&mut self) {
        self.trail.new_level();
    }

    pub(crate) fn num_prunings(&self) -> u64 {
        self.num_prunings
    }

    pub(crate) fn domain(&self, domain_id: DomainId) -> &IntervalDomain {
        &self.domains[domain_id]
    }

    /// Installs `new_domain`, which must be a subset of the current domain of `domain_id`.
    pub(crate) fn narrow(
        &mut self,
        domain_id: DomainId,
        new_domain: IntervalDomain,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        if new_domain.is_empty() {
            return Err(EmptyDomain);
        }

        trellis_assert_moderate!(new_domain.is_subset_of(&self.domains[domain_id]));

        let events = IntDomainEvent::between(&self.domains[domain_id], &new_domain);
        if events.is_empty() {
            return Ok(events);
        }

        let level = self.trail.level();
        if level > self.saved_at[domain_id] {
            let old_domain = std::mem::replace(&mut self.domains[domain_id], new_domain);
            self.trail.push(DomainSnapshot {
                domain_id,
                domain: old_domain,
                saved_at: self.saved_at[domain_id],
            });
            self.saved_at[domain_id] = level;
        } else {
            self.domains[domain_id] = new_domain;
        }

        self.num_prunings += 1;
        Ok(events)
    }

    pub(crate) fn set_lower_bound(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if value <= domain.min() {
            return Ok(EnumSet::empty());
        }

        let new_domain = domain.intersect_range(value, i32::MAX);
        self.narrow(domain_id, new_domain)
    }

    pub(crate) fn set_upper_bound(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if value >= domain.max() {
            return Ok(EnumSet::empty());
        }

        let new_domain = domain.intersect_range(i32::MIN, value);
        self.narrow(domain_id, new_domain)
    }

    pub(crate) fn set_bounds(
        &mut self,
        domain_id: DomainId,
        min: i32,
        max: i32,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if min <= domain.min() && max >= domain.max() {
            return Ok(EnumSet::empty());
        }

        let new_domain = domain.intersect_range(min, max);
        self.narrow(domain_id, new_domain)
    }

    pub(crate) fn intersect(
        &mut self,
        domain_id: DomainId,
        other: &IntervalDomain,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let new_domain = self.domains[domain_id].intersect(other);
        self.narrow(domain_id, new_domain)
    }

    pub(crate) fn subtract(
        &mut self,
        domain_id: DomainId,
        other: &IntervalDomain,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if !domain.is_intersecting(other) {
            return Ok(EnumSet::empty());
        }

        let new_domain = domain.subtract(other);
        self.narrow(domain_id, new_domain)
    }

    pub(crate) fn remove_range(
        &mut self,
        domain_id: DomainId,
        min: i32,
        max: i32,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if max < domain.min() || min > domain.max() {
            return Ok(EnumSet::empty());
        }

        let new_domain = domain.subtract_range(min, max);
        self.narrow(domain_id, new_domain)
    }

    pub(crate) fn remove(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        if !self.domains[domain_id].contains(value) {
            return Ok(EnumSet::empty());
        }

        self.remove_range(domain_id, value, value)
    }

    pub(crate) fn assign(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<EnumSet<IntDomainEvent>, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if !domain.contains(value) {
            return Err(EmptyDomain);
        }

        self.set_bounds(domain_id, value, value)
    }

    /// Restores every domain to the state it had at `new_level`.
    pub(crate) fn synchronise(&mut self, new_level: usize) {
        for snapshot in self.trail.synchronise(new_level) {
            self.saved_at[snapshot.domain_id] = snapshot.saved_at;
            self.domains[snapshot.domain_id] = snapshot.domain;
        }

        trellis_assert_moderate!(self
            .saved_at
            .iter()
            .all(|&saved_at| saved_at <= new_level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn narrowing_reports_events_and_counts_prunings() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(IntervalDomain::new(0, 10));

        let events = assignments.set_lower_bound(x, 3).expect("non-empty");
        assert!(events.contains(IntDomainEvent::LowerBound));
        assert_eq!(assignments.domain(x).min(), 3);
        assert_eq!(assignments.num_prunings(), 1);

        let events = assignments.set_lower_bound(x, 2).expect("non-empty");
        assert!(events.is_empty());
        assert_eq!(assignments.num_prunings(), 1);
    }

    #[test]
    fn emptying_a_domain_leaves_it_unchanged() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(IntervalDomain::new(0, 3));

        assert_eq!(assignments.set_lower_bound(x, 4), Err(EmptyDomain));
        assert_eq!(assignments.assign(x, 7), Err(EmptyDomain));
        assert_eq!(assignments.domain(x), &IntervalDomain::new(0, 3));
    }

    #[test]
    fn domains_are_restored_per_level() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(IntervalDomain::new(0, 10));
        let y = assignments.grow(IntervalDomain::new(0, 10));

        let _ = assignments.remove(x, 5).expect("non-empty");

        assignments.new_level();
        let _ = assignments.set_upper_bound(x, 7).expect("non-empty");
        let _ = assignments.set_upper_bound(x, 6).expect("non-empty");

        assignments.new_level();
        let _ = assignments.assign(x, 2).expect("non-empty");
        let _ = assignments.assign(y, 9).expect("non-empty");

        assignments.synchronise(1);
        assert_eq!(assignments.domain(x).to_string(), "{0..4, 6}");
        assert_eq!(assignments.domain(y), &IntervalDomain::new(0, 10));

        // Narrowing again at level 1 must still be undone when going back to the root.
        let _ = assignments.set_lower_bound(x, 3).expect("non-empty");
        assignments.synchronise(0);
        assert_eq!(assignments.domain(x).to_string(), "{0..4, 6..10}");
    }

    #[test]
    fn keys_are_dense() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(IntervalDomain::singleton(1));
        let y = assignments.grow(IntervalDomain::singleton(2));

        assert_eq!(x.index(), 0);
        assert_eq!(y.index(), 1);
        assert_eq!(assignments.num_domains(), 2);
    }
}
