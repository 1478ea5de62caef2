use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Friday, January 1, 2021 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_609_459_200_000);

/// A source of "now", in milliseconds since a custom epoch.
///
/// The generator reads time only through this trait, so tests can simulate
/// frozen clocks, forward jumps and backward jumps deterministically.
///
/// # Example
///
/// ```
/// use snowgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
