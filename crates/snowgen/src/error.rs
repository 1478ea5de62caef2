use core::convert::Infallible;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `snowgen` can produce.
///
/// Sequence exhaustion is not an error: the generator waits for the next
/// millisecond (or reports [`Poll::Pending`]) instead.
///
/// [`Poll::Pending`]: crate::Poll::Pending
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The worker ID lies outside `0..=1023`.
    ///
    /// Clamping or wrapping would risk colliding with another node, so no
    /// generator is produced.
    #[error("invalid worker ID {value}: must be between 0 and {max}", max = crate::WorkerId::MAX)]
    InvalidWorkerId {
        /// The rejected input, widened so any integer source fits.
        value: i128,
    },

    /// The clock reported a time earlier than the last issued timestamp by
    /// more than the configured tolerance.
    #[error("clock moved backward: last issued timestamp {last}, clock now reads {now}")]
    ClockMovedBackward {
        /// Timestamp of the last issued ID (ms since epoch).
        last: u64,
        /// Timestamp the clock just reported (ms since epoch).
        now: u64,
    },

    /// The elapsed time since the epoch no longer fits the 41-bit field.
    #[error("timestamp {timestamp} exceeds the 41-bit timestamp field")]
    TimestampOverflow {
        /// The offending timestamp (ms since epoch).
        timestamp: u64,
    },

    /// The system clock reads a time before the configured epoch.
    #[error("system clock is earlier than the configured epoch")]
    ClockBeforeEpoch,

    /// A raw value could not be interpreted as a [`SnowflakeId`].
    ///
    /// [`SnowflakeId`]: crate::SnowflakeId
    #[error("invalid snowflake ID: {reason}")]
    InvalidId {
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
