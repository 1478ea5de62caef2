use crate::SnowflakeId;

/// Outcome of a single non-blocking generation attempt.
///
/// Returned by [`SnowflakeGenerator::try_poll_id`], which lets callers pick
/// their own backoff (spin, yield, sleep, async timer) instead of the
/// built-in spin of [`SnowflakeGenerator::next_id`].
///
/// [`SnowflakeGenerator::try_poll_id`]: crate::SnowflakeGenerator::try_poll_id
/// [`SnowflakeGenerator::next_id`]: crate::SnowflakeGenerator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID can be issued yet: either the sequence is exhausted for the
    /// current millisecond or the clock is behind within the tolerated drift.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}

impl Poll {
    /// Returns the ID if one was issued.
    pub const fn ready(self) -> Option<SnowflakeId> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }

    /// Returns `true` if the caller has to back off.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}
