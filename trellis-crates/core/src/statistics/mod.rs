//! Statistics of the store and of individual propagators.
mod cumulative_moving_average;
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;
use std::fmt::Write;

pub use cumulative_moving_average::CumulativeMovingAverage;
pub use statistic_logger::StatisticLogger;
pub use statistic_logging::*;

/// A statistic which can be logged.
///
/// See [`create_statistics_struct!`](crate::create_statistics_struct) for creating a statistic
/// struct automatically.
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut statistic_logger: StatisticLogger) {
        let _ = write!(statistic_logger, "{self}");
    }
}

/// Generates a struct of statistics which logs every field under its own name.
///
/// # Example
/// ```rust
/// # use trellis_core::create_statistics_struct;
/// create_statistics_struct!(Statistics {
///     number_of_calls: usize
/// });
///
/// let statistics = Statistics::default();
///
/// assert_eq!(statistics.number_of_calls, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ty),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub(crate) struct $name {
            $($(#[$variable_documentation])* pub(crate) $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $($crate::statistics::Statistic::log(&self.$field, statistic_logger.attach_to_prefix(stringify!($field))));+
            }
        }
    };
}
