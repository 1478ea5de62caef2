use core::{fmt, str::FromStr, time::Duration};

use crate::{Error, Result};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero, so the ID is a non-negative `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21            12 11             0
///              +--------------+----------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
///              +--------------+----------------+----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ----------->|
/// ```
///
/// Ordering of IDs follows ordering of `(timestamp, worker_id, sequence)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 10-bit worker ID field. Occupies bits 12 through 21.
    pub const WORKER_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID. Each field is masked to its width.
    pub const fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Wraps a raw value without validation. The reserved bit is cleared.
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            id: raw & (u64::MAX >> 1),
        }
    }

    /// Returns the packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the packed value as a signed integer. Never negative.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Extracts the timestamp (ms since the epoch).
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Largest timestamp the layout can carry.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Largest sequence value within one millisecond.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns `true` if another ID fits in the current millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the ID that follows this one within the same millisecond.
    pub(crate) const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.worker_id(), self.sequence() + 1)
    }

    /// Returns the first ID of a different millisecond.
    pub(crate) const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.worker_id(), 0)
    }

    /// Converts the timestamp back to milliseconds since the Unix epoch, given
    /// the epoch the ID was generated against.
    ///
    /// Returns `None` if the result does not fit in a `u64`.
    pub fn unix_millis(&self, epoch: Duration) -> Option<u64> {
        u64::try_from(epoch.as_millis())
            .ok()?
            .checked_add(self.timestamp())
    }

    /// Returns the ID as a zero-padded 20-digit string, which sorts
    /// lexicographically in the same order as the IDs.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw: i64 = s.trim().parse().map_err(|_| Error::InvalidId {
            reason: "not a decimal integer",
        })?;
        Self::try_from(raw)
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        u64::try_from(raw)
            .map(Self::from_raw)
            .map_err(|_| Error::InvalidId {
                reason: "negative value",
            })
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_EPOCH;

    #[test]
    fn packs_fields_at_documented_offsets() {
        let id = SnowflakeId::from_components(1000, 2, 1);
        assert_eq!(id.to_raw(), (1000 << 22) | (2 << 12) | 1);
        assert_eq!(id.timestamp(), 1000);
        assert_eq!(id.worker_id(), 2);
        assert_eq!(id.sequence(), 1);
    }

    #[test]
    fn max_components_keep_sign_bit_clear() {
        let id = SnowflakeId::from_components(
            SnowflakeId::max_timestamp(),
            SnowflakeId::WORKER_ID_MASK,
            SnowflakeId::max_sequence(),
        );
        assert_eq!(id.to_raw(), i64::MAX as u64);
        assert!(id.to_i64() > 0);
        assert!(!id.has_sequence_room());
    }

    #[test]
    fn oversized_fields_are_masked() {
        let id = SnowflakeId::from_components(0, 1024 + 5, 4096 + 9);
        assert_eq!(id.timestamp(), 0);
        assert_eq!(id.worker_id(), 5);
        assert_eq!(id.sequence(), 9);
    }

    #[test]
    fn from_raw_clears_reserved_bit() {
        let id = SnowflakeId::from_raw(u64::MAX);
        assert_eq!(id.to_raw(), i64::MAX as u64);
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, 3, 4095);
        let b = SnowflakeId::from_components(11, 3, 0);
        let c = b.increment_sequence();
        assert!(a < b && b < c);
        assert_eq!(a.rollover_to_timestamp(11), b);
    }

    #[test]
    fn parses_decimal_and_rejects_negative() {
        let id = SnowflakeId::from_components(123_456, 42, 7);
        let parsed: SnowflakeId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        assert!(matches!(
            "-1".parse::<SnowflakeId>(),
            Err(Error::InvalidId { .. })
        ));
        assert!(matches!(
            "snow".parse::<SnowflakeId>(),
            Err(Error::InvalidId { .. })
        ));
    }

    #[test]
    fn padded_string_is_twenty_digits() {
        let id = SnowflakeId::from_components(1, 0, 0);
        let padded = id.to_padded_string();
        assert_eq!(padded.len(), 20);
        assert_eq!(padded, "00000000000004194304");
    }

    #[test]
    fn unix_millis_adds_epoch() {
        let id = SnowflakeId::from_components(5, 0, 0);
        assert_eq!(id.unix_millis(DEFAULT_EPOCH), Some(1_609_459_200_005));
    }

    #[test]
    fn unix_millis_reports_overflow() {
        let id = SnowflakeId::from_components(1, 0, 0);
        assert_eq!(id.unix_millis(Duration::from_millis(u64::MAX)), None);
        assert_eq!(id.unix_millis(Duration::from_secs(u64::MAX)), None);
        assert_eq!(
            id.unix_millis(Duration::from_millis(u64::MAX - 1)),
            Some(u64::MAX)
        );
    }

    #[test]
    fn debug_shows_decoded_fields() {
        let id = SnowflakeId::from_components(8, 9, 10);
        let debug = format!("{id:?}");
        assert!(debug.contains("timestamp: 8"));
        assert!(debug.contains("worker_id: 9"));
        assert!(debug.contains("sequence: 10"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_integer() {
        let id = SnowflakeId::from_components(77, 1, 2);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
