use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, MonotonicClock, Result, SnowflakeId, TimeSource, WorkerId,
    generator::{
        Poll,
        mutex::{State, new_state},
    },
};

/// A thread-safe Snowflake ID generator for one node.
///
/// The last issued `(timestamp, sequence)` pair lives behind a single mutex:
/// every call reads the clock, compares and updates that pair inside one
/// critical section, so concurrent callers can never interleave and every
/// returned ID is strictly greater than the one before it.
///
/// Share a generator by reference or wrap it in an [`Arc`]; it is `Sync`
/// whenever its time source is.
///
/// ## Clock regression
///
/// If the clock reports a time earlier than the last issued timestamp, the
/// generator never silently emits a smaller ID:
///
/// - a gap within [`clock_tolerance`] is waited out (`next_id` spins,
///   `try_poll_id` returns [`Poll::Pending`]);
/// - a larger gap fails with [`Error::ClockMovedBackward`] and leaves the
///   state untouched, so the call can be retried once the clock recovers.
///
/// The default tolerance is zero: every regression is an error.
///
/// [`Arc`]: std::sync::Arc
/// [`clock_tolerance`]: SnowflakeGenerator::clock_tolerance
#[derive(Debug)]
pub struct SnowflakeGenerator<T = MonotonicClock>
where
    T: TimeSource,
{
    state: State,
    worker_id: WorkerId,
    clock_tolerance: u64,
    time: T,
}

impl SnowflakeGenerator<MonotonicClock> {
    /// Creates a generator for `worker_id` backed by a [`MonotonicClock`]
    /// counting from [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWorkerId`] if `worker_id` is outside `0..=1023`.
    /// - [`Error::ClockBeforeEpoch`] if the system clock reads a time before
    ///   the epoch.
    ///
    /// # Example
    ///
    /// ```
    /// use snowgen::{Error, SnowflakeGenerator};
    ///
    /// assert!(SnowflakeGenerator::new(0).is_ok());
    /// assert!(SnowflakeGenerator::new(1023).is_ok());
    /// assert!(matches!(
    ///     SnowflakeGenerator::new(1024),
    ///     Err(Error::InvalidWorkerId { value: 1024 })
    /// ));
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new<W>(worker_id: W) -> Result<Self>
    where
        W: TryInto<WorkerId>,
        Error: From<W::Error>,
    {
        let worker_id: WorkerId = worker_id.try_into()?;
        let time = MonotonicClock::try_default()?;
        let now = time.current_millis();
        Self::build(worker_id, now, 0, time)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `worker_id` reading time from `time`.
    ///
    /// The last timestamp starts at the clock's current reading and the
    /// sequence at zero.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWorkerId`] if `worker_id` is outside `0..=1023`.
    /// - [`Error::TimestampOverflow`] if the clock already reads past the
    ///   41-bit range.
    pub fn with_clock<W>(worker_id: W, time: T) -> Result<Self>
    where
        W: TryInto<WorkerId>,
        Error: From<W::Error>,
    {
        let worker_id: WorkerId = worker_id.try_into()?;
        let now = time.current_millis();
        Self::build(worker_id, now, 0, time)
    }

    /// Creates a generator from an explicit last timestamp and sequence.
    ///
    /// Useful to resume from a known point or to pin the starting state in
    /// tests. Prefer [`Self::with_clock`] otherwise.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWorkerId`] if `worker_id` is outside `0..=1023`.
    /// - [`Error::TimestampOverflow`] if `timestamp` does not fit 41 bits.
    /// - [`Error::InvalidId`] if `sequence` does not fit 12 bits.
    pub fn from_components<W>(worker_id: W, timestamp: u64, sequence: u64, time: T) -> Result<Self>
    where
        W: TryInto<WorkerId>,
        Error: From<W::Error>,
    {
        let worker_id: WorkerId = worker_id.try_into()?;
        Self::build(worker_id, timestamp, sequence, time)
    }

    fn build(worker_id: WorkerId, timestamp: u64, sequence: u64, time: T) -> Result<Self> {
        if timestamp > SnowflakeId::max_timestamp() {
            return Err(Error::TimestampOverflow { timestamp });
        }
        if sequence > SnowflakeId::max_sequence() {
            return Err(Error::InvalidId {
                reason: "sequence exceeds 12 bits",
            });
        }

        let id = SnowflakeId::from_components(timestamp, worker_id.into(), sequence);
        Ok(Self {
            state: new_state(id),
            worker_id,
            clock_tolerance: 0,
            time,
        })
    }

    /// Sets how far (in milliseconds) the clock may fall behind the last
    /// issued timestamp before generation fails with
    /// [`Error::ClockMovedBackward`]. Smaller regressions are waited out.
    #[must_use]
    pub fn with_clock_tolerance(mut self, millis: u64) -> Self {
        self.clock_tolerance = millis;
        self
    }

    /// The worker ID embedded in every issued ID.
    pub const fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// The tolerated backward clock drift, in milliseconds.
    pub const fn clock_tolerance(&self) -> u64 {
        self.clock_tolerance
    }

    /// The time source this generator reads.
    pub const fn clock(&self) -> &T {
        &self.time
    }

    /// Generates the next ID, blocking until one is available.
    ///
    /// When 4096 IDs have already been issued in the current millisecond the
    /// call spins on the clock, holding the lock, until the millisecond
    /// advances. Concurrent callers queue behind it. There is no timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackward`] if the clock regressed beyond the
    ///   tolerance.
    /// - [`Error::TimestampOverflow`] once the epoch is more than 2^41 ms
    ///   (about 69 years) in the past.
    ///
    /// # Example
    ///
    /// ```
    /// use snowgen::SnowflakeGenerator;
    ///
    /// let generator = SnowflakeGenerator::new(1).unwrap();
    /// let ids: Vec<_> = (0..10_000).map(|_| generator.next_id().unwrap()).collect();
    /// assert!(ids.windows(2).all(|w| w[0] < w[1]));
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = %self.worker_id)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut last = self.state.lock();
        #[cfg(feature = "tracing")]
        let mut waited = false;

        loop {
            let now = self.time.current_millis();
            match self.advance(&mut last, now)? {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { .. } => {
                    #[cfg(feature = "tracing")]
                    if !waited {
                        waited = true;
                        tracing::debug!(timestamp = last.timestamp(), "waiting for the clock to advance");
                    }
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Generates the next ID as a non-negative `i64`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    pub fn next_id_i64(&self) -> Result<i64> {
        self.next_id().map(|id| id.to_i64())
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new ID was issued
    /// - `Ok(Poll::Pending { yield_for })`: wait `yield_for` milliseconds and
    ///   try again
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    ///
    /// # Example
    ///
    /// ```
    /// use snowgen::{Poll, SnowflakeGenerator};
    ///
    /// let generator = SnowflakeGenerator::new(2).unwrap();
    /// let id = loop {
    ///     match generator.try_poll_id().unwrap() {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(id.worker_id(), 2);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = %self.worker_id)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let mut last = self.state.lock();
        let now = self.time.current_millis();
        self.advance(&mut last, now)
    }

    /// Moves the state forward for a clock reading of `now`. Must be called
    /// with the state locked.
    fn advance(&self, last: &mut SnowflakeId, now: u64) -> Result<Poll> {
        if now > SnowflakeId::max_timestamp() {
            return Err(Error::TimestampOverflow { timestamp: now });
        }

        let last_ts = last.timestamp();
        match now.cmp(&last_ts) {
            Ordering::Equal => {
                if last.has_sequence_room() {
                    *last = last.increment_sequence();
                    Ok(Poll::Ready { id: *last })
                } else {
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                *last = last.rollover_to_timestamp(now);
                Ok(Poll::Ready { id: *last })
            }
            Ordering::Less => self.cold_clock_behind(now, last_ts),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: u64, last: u64) -> Result<Poll> {
        let behind = last - now;
        if behind <= self.clock_tolerance {
            return Ok(Poll::Pending { yield_for: behind });
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(last, now, behind, tolerance = self.clock_tolerance, "clock moved backward");

        Err(Error::ClockMovedBackward { last, now })
    }
}
