use crate::create_statistics_struct;
use crate::statistics::CumulativeMovingAverage;

create_statistics_struct!(
    /// Counters describing the work performed by a [`Store`](super::Store).
    StoreStatistics {
        /// The number of calls to [`Store::consistency`](super::Store::consistency)
        num_consistency_calls: u64,
        /// The number of times a propagator ran
        num_propagator_calls: u64,
        /// The number of fixpoint computations which ended in a contradiction
        num_failures: u64,
        num_imposed_constraints: u64,
        /// The number of constraints removed because the store restored a level below the one at
        /// which they were imposed
        num_retired_constraints: u64,
        num_restores: u64,
        /// The number of propagator runs which narrowed a domain right after the propagator
        /// returned, only counted with [`StoreOptions::check_fixpoints`](super::StoreOptions)
        num_fixpoint_violations: u64,
        /// The number of propagator runs per call to [`Store::consistency`](super::Store::consistency)
        average_propagator_calls_per_fixpoint: CumulativeMovingAverage<u64>,
    }
);
