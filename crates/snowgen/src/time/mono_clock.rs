use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::{DEFAULT_EPOCH, Error, Result, TimeSource};

/// A wall-clock-aligned time source that never goes backward.
///
/// At construction the clock captures `SystemTime::now()` relative to the
/// epoch together with an `Instant`. Every read returns that offset plus the
/// monotonic time elapsed since, so timestamps still encode calendar time but
/// NTP steps or manual clock changes after startup cannot make them regress.
///
/// Cloning is cheap and clones share the same anchor.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64, // in milliseconds
    epoch: Duration,
}

impl MonotonicClock {
    /// Constructs a monotonic clock whose zero point is `epoch`, given as a
    /// [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system time is earlier than
    /// `epoch`.
    ///
    /// # Example
    ///
    /// ```
    /// use snowgen::{MonotonicClock, TimeSource, DEFAULT_EPOCH};
    ///
    /// let clock = MonotonicClock::try_with_epoch(DEFAULT_EPOCH).unwrap();
    /// let a = clock.current_millis();
    /// let b = clock.current_millis();
    /// assert!(b >= a);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn try_with_epoch(epoch: Duration) -> Result<Self> {
        let start = Instant::now();
        let offset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|now| now.checked_sub(epoch))
            .ok_or(Error::ClockBeforeEpoch)?;

        Ok(Self {
            start,
            epoch_offset: offset.as_millis() as u64,
            epoch,
        })
    }

    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads a time
    /// before 2021.
    pub fn try_default() -> Result<Self> {
        Self::try_with_epoch(DEFAULT_EPOCH)
    }

    /// The epoch this clock counts from.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for MonotonicClock {
    #[allow(clippy::cast_possible_truncation)]
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.start.elapsed().as_millis() as u64
    }
}
