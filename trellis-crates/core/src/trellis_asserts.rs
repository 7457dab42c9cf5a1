#[cfg(not(feature = "debug-checks"))]
pub const TRELLIS_ASSERT_LEVEL_DEFINITION: u8 = TRELLIS_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub const TRELLIS_ASSERT_LEVEL_DEFINITION: u8 = TRELLIS_ASSERT_EXTREME;

pub const TRELLIS_ASSERT_SIMPLE: u8 = 1;
pub const TRELLIS_ASSERT_MODERATE: u8 = 2;
pub const TRELLIS_ASSERT_ADVANCED: u8 = 3;
pub const TRELLIS_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! print_trellis_assert_warning_message {
    () => {
        if $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION
            >= $crate::trellis_asserts::TRELLIS_ASSERT_MODERATE
        {
            log::warn!(
                "Potential performance degradation: the Trellis assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
                $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION
            );
        };
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_simple {
    ($($arg:tt)*) => {
        if $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::trellis_asserts::TRELLIS_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::trellis_asserts::TRELLIS_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::trellis_asserts::TRELLIS_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::trellis_asserts::TRELLIS_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::trellis_asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::trellis_asserts::TRELLIS_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
