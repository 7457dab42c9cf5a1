use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use crate::trellis_assert_moderate;
use crate::trellis_assert_simple;

/// A closed range of integers `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub min: i32,
    pub max: i32,
}

impl Interval {
    pub fn new(min: i32, max: i32) -> Interval {
        trellis_assert_simple!(min <= max, "an interval cannot be empty");
        Interval { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn size(&self) -> u64 {
        (self.max as i64 - self.min as i64 + 1) as u64
    }
}

/// A finite set of integers stored as a list of sorted, disjoint and non-adjacent intervals.
///
/// All operations are pure; narrowing the domain of a variable happens through the
/// [`Store`](crate::Store) or a [`PropagationContext`](crate::propagation::PropagationContext),
/// which install the result of these operations and record the old domain for backtracking.
///
/// The empty domain is representable so that set algebra stays total, but the domain of a
/// variable is never empty. Asking for the bounds of an empty domain panics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct IntervalDomain {
    intervals: Vec<Interval>,
}

impl IntervalDomain {
    /// Creates the domain `{min..max}`, which is empty if `min > max`.
    pub fn new(min: i32, max: i32) -> IntervalDomain {
        if min > max {
            return IntervalDomain::empty();
        }

        IntervalDomain {
            intervals: vec![Interval { min, max }],
        }
    }

    pub fn empty() -> IntervalDomain {
        IntervalDomain::default()
    }

    pub fn singleton(value: i32) -> IntervalDomain {
        IntervalDomain::new(value, value)
    }

    /// The domain of every representable integer.
    pub fn full() -> IntervalDomain {
        IntervalDomain::new(i32::MIN, i32::MAX)
    }

    pub fn from_values(values: impl IntoIterator<Item = i32>) -> IntervalDomain {
        IntervalDomain::from_intervals(values.into_iter().map(|value| Interval {
            min: value,
            max: value,
        }))
    }

    /// Creates the union of the given intervals, which do not have to be sorted or disjoint.
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> IntervalDomain {
        let mut intervals = intervals.into_iter().collect::<Vec<_>>();
        intervals.sort_unstable_by_key(|interval| interval.min);

        let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            match merged.last_mut() {
                Some(last) if interval.min as i64 <= last.max as i64 + 1 => {
                    last.max = last.max.max(interval.max);
                }
                _ => merged.push(interval),
            }
        }

        IntervalDomain { intervals: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn min(&self) -> i32 {
        self.intervals[0].min
    }

    pub fn max(&self) -> i32 {
        self.intervals[self.intervals.len() - 1].max
    }

    /// The number of values in the domain.
    pub fn size(&self) -> u64 {
        self.intervals.iter().map(Interval::size).sum()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.intervals.len() == 1 && self.intervals[0].min == self.intervals[0].max
    }

    pub fn singleton_value(&self) -> Option<i32> {
        self.is_singleton().then(|| self.intervals[0].min)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.position_of(value).is_ok()
    }

    /// Locates `value`; `Ok` holds the index of the interval containing it and `Err` the index of
    /// the first interval above it.
    fn position_of(&self, value: i32) -> Result<usize, usize> {
        self.intervals.binary_search_by(|interval| {
            if interval.max < value {
                std::cmp::Ordering::Less
            } else if interval.min > value {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
    }

    /// The smallest value in the domain which is strictly larger than `value`.
    pub fn next_value(&self, value: i32) -> Option<i32> {
        let next = value.checked_add(1)?;
        match self.position_of(next) {
            Ok(_) => Some(next),
            Err(index) => self.intervals.get(index).map(|interval| interval.min),
        }
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    pub fn previous_value(&self, value: i32) -> Option<i32> {
        let previous = value.checked_sub(1)?;
        match self.position_of(previous) {
            Ok(_) => Some(previous),
            Err(0) => None,
            Err(index) => Some(self.intervals[index - 1].max),
        }
    }

    pub fn intersect(&self, other: &IntervalDomain) -> IntervalDomain {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.intervals.len() && j < other.intervals.len() {
            let left = self.intervals[i];
            let right = other.intervals[j];

            let min = left.min.max(right.min);
            let max = left.max.min(right.max);
            if min <= max {
                result.push(Interval { min, max });
            }

            if left.max < right.max {
                i += 1;
            } else {
                j += 1;
            }
        }

        IntervalDomain { intervals: result }
    }

    /// Restricts the domain to `{min..max}`.
    pub fn intersect_range(&self, min: i32, max: i32) -> IntervalDomain {
        if min > max {
            return IntervalDomain::empty();
        }

        let intervals = self
            .intervals
            .iter()
            .filter(|interval| interval.max >= min && interval.min <= max)
            .map(|interval| Interval {
                min: interval.min.max(min),
                max: interval.max.min(max),
            })
            .collect();

        IntervalDomain { intervals }
    }

    pub fn union(&self, other: &IntervalDomain) -> IntervalDomain {
        IntervalDomain::from_intervals(self.intervals.iter().chain(other.intervals.iter()).copied())
    }

    /// The values of this domain which are not in `other`.
    pub fn subtract(&self, other: &IntervalDomain) -> IntervalDomain {
        if other.is_empty() || !self.is_intersecting(other) {
            return self.clone();
        }

        self.intersect(&other.complement())
    }

    pub fn subtract_value(&self, value: i32) -> IntervalDomain {
        self.subtract_range(value, value)
    }

    /// Removes `{min..max}` from the domain.
    pub fn subtract_range(&self, min: i32, max: i32) -> IntervalDomain {
        if min > max {
            return self.clone();
        }

        let mut intervals = Vec::with_capacity(self.intervals.len() + 1);
        for &interval in self.intervals.iter() {
            if interval.max < min || interval.min > max {
                intervals.push(interval);
                continue;
            }

            if interval.min < min {
                intervals.push(Interval {
                    min: interval.min,
                    max: min - 1,
                });
            }
            if interval.max > max {
                intervals.push(Interval {
                    min: max + 1,
                    max: interval.max,
                });
            }
        }

        IntervalDomain { intervals }
    }

    /// The integers which are not in this domain.
    pub fn complement(&self) -> IntervalDomain {
        let mut intervals = Vec::with_capacity(self.intervals.len() + 1);
        let mut next_min = i32::MIN as i64;

        for interval in self.intervals.iter() {
            if (interval.min as i64) > next_min {
                intervals.push(Interval {
                    min: next_min as i32,
                    max: interval.min - 1,
                });
            }
            next_min = interval.max as i64 + 1;
        }

        if next_min <= i32::MAX as i64 {
            intervals.push(Interval {
                min: next_min as i32,
                max: i32::MAX,
            });
        }

        IntervalDomain { intervals }
    }

    /// The domain `{v + shift | v in self}`; values which leave the 32-bit range are dropped.
    pub fn shifted(&self, shift: i32) -> IntervalDomain {
        let intervals = self
            .intervals
            .iter()
            .filter_map(|interval| {
                let min = (interval.min as i64 + shift as i64).max(i32::MIN as i64);
                let max = (interval.max as i64 + shift as i64).min(i32::MAX as i64);
                (min <= max).then_some(Interval {
                    min: min as i32,
                    max: max as i32,
                })
            })
            .collect();

        IntervalDomain { intervals }
    }

    /// The domain `{-v | v in self}`, dropping `-i32::MIN`.
    pub fn negated(&self) -> IntervalDomain {
        IntervalDomain::from_intervals(self.intervals.iter().rev().filter_map(|interval| {
            let max = interval.min.checked_neg().unwrap_or(i32::MAX);
            let min = interval.max.checked_neg()?;
            Some(Interval { min, max })
        }))
    }

    pub fn is_intersecting(&self, other: &IntervalDomain) -> bool {
        let (mut i, mut j) = (0, 0);

        while i < self.intervals.len() && j < other.intervals.len() {
            let left = self.intervals[i];
            let right = other.intervals[j];

            if left.min.max(right.min) <= left.max.min(right.max) {
                return true;
            }

            if left.max < right.max {
                i += 1;
            } else {
                j += 1;
            }
        }

        false
    }

    pub fn is_subset_of(&self, other: &IntervalDomain) -> bool {
        self.intervals.iter().all(|interval| {
            other
                .position_of(interval.min)
                .is_ok_and(|index| other.intervals[index].max >= interval.max)
        })
    }

    /// Iterates over the values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.intervals
            .iter()
            .flat_map(|interval| interval.min..=interval.max)
    }

    /// Iterates over the intervals in ascending order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.intervals.iter().copied()
    }

    fn is_normalised(&self) -> bool {
        self.intervals.iter().all(|interval| interval.min <= interval.max)
            && self
                .intervals
                .iter()
                .tuple_windows()
                .all(|(left, right)| (left.max as i64) + 1 < right.min as i64)
    }
}

impl From<Interval> for IntervalDomain {
    fn from(interval: Interval) -> Self {
        IntervalDomain::new(interval.min, interval.max)
    }
}

impl Display for IntervalDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        trellis_assert_moderate!(self.is_normalised());

        let intervals = self.intervals.iter().format_with(", ", |interval, f| {
            if interval.min == interval.max {
                f(&interval.min)
            } else {
                f(&format_args!("{}..{}", interval.min, interval.max))
            }
        });

        write!(f, "{{{intervals}}}")
    }
}
