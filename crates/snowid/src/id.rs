use core::{fmt, str::FromStr};

use crate::{Error, Result};

/// A 64-bit, time-sortable identifier.
///
/// - 1 bit reserved (always zero, so the value also fits an `i64`)
/// - 41 bits timestamp (ms since the generator epoch, ~69 years)
/// - 12 bits machine ID
/// - 10 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             10 9              0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (12) | sequence (10) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// Fields are ordered high to low so that numeric ordering of two IDs matches
/// the order in which they were created.
///
/// # Example
///
/// ```
/// use snowid::SnowId;
///
/// let id = SnowId::from_components(1000, 7, 3);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.machine_id(), 7);
/// assert_eq!(id.sequence(), 3);
/// assert_eq!(id.to_string().parse::<SnowId>().unwrap(), id);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowId {
    id: u64,
}

impl SnowId {
    /// Bitmask for the reserved most significant bit.
    pub const RESERVED_MASK: u64 = 1 << 63;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 12-bit machine ID field. Occupies bits 10
    /// through 21.
    pub const MACHINE_ID_MASK: u64 = (1 << 12) - 1;

    /// Bitmask for extracting the 10-bit sequence field. Occupies bits 0
    /// through 9.
    pub const SEQUENCE_MASK: u64 = (1 << 10) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the machine ID to its correct position (bit 10).
    pub const MACHINE_ID_SHIFT: u64 = 10;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Largest encodable epoch-relative timestamp.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest encodable machine ID.
    pub const MAX_MACHINE_ID: u64 = Self::MACHINE_ID_MASK;

    /// Largest sequence value within one millisecond.
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the three fields into an ID.
    ///
    /// Each field is masked to its width; callers are responsible for
    /// range-checking beforehand. Debug builds assert the widths.
    pub const fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(machine_id <= Self::MACHINE_ID_MASK, "machine_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw `u64`.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the epoch-relative timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID from the packed ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns `true` if the reserved bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id & Self::RESERVED_MASK == 0
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    /// Returns true if the current sequence value can be incremented.
    pub(crate) const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::MAX_SEQUENCE
    }

    /// Returns a new ID with the sequence incremented.
    pub(crate) const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    pub(crate) const fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.machine_id(), 0)
    }
}

impl TryFrom<u64> for SnowId {
    type Error = Error;

    /// Wraps `raw`, rejecting values with the reserved bit set.
    fn try_from(raw: u64) -> Result<Self> {
        let id = Self::from_raw(raw);
        if !id.is_valid() {
            return Err(Error::InvalidIdentifier {
                input: raw.to_string(),
            });
        }
        Ok(id)
    }
}

impl From<SnowId> for u64 {
    fn from(id: SnowId) -> Self {
        id.to_raw()
    }
}

impl FromStr for SnowId {
    type Err = Error;

    /// Parses the base-10 form, rejecting values with the reserved bit set.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidIdentifier {
            input: s.to_owned(),
        };
        let raw = s.trim().parse::<u64>().map_err(|_| invalid())?;
        Self::try_from(raw).map_err(|_| invalid())
    }
}

impl fmt::Display for SnowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_and_bounds() {
        let ts = SnowId::MAX_TIMESTAMP;
        let mid = SnowId::MAX_MACHINE_ID;
        let seq = SnowId::MAX_SEQUENCE;

        let id = SnowId::from_components(ts, mid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.machine_id(), mid);
        assert_eq!(id.sequence(), seq);
        assert!(id.is_valid());
        assert_eq!(id.to_raw(), i64::MAX as u64);
    }

    #[test]
    fn field_positions() {
        assert_eq!(SnowId::from_components(1, 0, 0).to_raw(), 1 << 22);
        assert_eq!(SnowId::from_components(0, 1, 0).to_raw(), 1 << 10);
        assert_eq!(SnowId::from_components(0, 0, 1).to_raw(), 1);
    }

    #[test]
    fn fields_roundtrip_independently() {
        for (ts, mid, seq) in [(0, 0, 0), (123, 7, 0), (1 << 40, 4095, 1023), (42, 2048, 512)] {
            let id = SnowId::from_components(ts, mid, seq);
            assert_eq!((id.timestamp(), id.machine_id(), id.sequence()), (ts, mid, seq));
        }
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let a = SnowId::from_components(10, 4095, 1023);
        let b = SnowId::from_components(11, 0, 0);
        let c = SnowId::from_components(11, 0, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn sequence_helpers() {
        let id = SnowId::from_components(5, 9, SnowId::MAX_SEQUENCE - 1);
        assert!(id.has_sequence_room());
        let next = id.increment_sequence();
        assert_eq!(next.sequence(), SnowId::MAX_SEQUENCE);
        assert!(!next.has_sequence_room());

        let rolled = next.rollover_to_timestamp(6);
        assert_eq!(rolled.timestamp(), 6);
        assert_eq!(rolled.machine_id(), 9);
        assert_eq!(rolled.sequence(), 0);
    }

    #[test]
    fn parses_decimal_strings() {
        let id = SnowId::from_components(1_000, 3, 2);
        assert_eq!(id.to_string().parse::<SnowId>(), Ok(id));
        assert_eq!(format!(" {id} ").parse::<SnowId>(), Ok(id));
        assert_eq!(id.to_padded_string().len(), 20);
        assert_eq!(id.to_padded_string().parse::<SnowId>(), Ok(id));
    }

    #[test]
    fn rejects_bad_strings() {
        for input in ["", "abc", "-1", "1.5", "18446744073709551616"] {
            assert_eq!(
                input.parse::<SnowId>(),
                Err(Error::InvalidIdentifier {
                    input: input.to_owned()
                })
            );
        }
        // Reserved bit set.
        let input = (1u64 << 63).to_string();
        assert!(matches!(
            input.parse::<SnowId>(),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn reserved_bit_is_rejected_in_every_form() {
        let raw = SnowId::RESERVED_MASK | SnowId::from_components(123, 7, 0).to_raw();
        let text = raw.to_string();
        let expected = Err(Error::InvalidIdentifier {
            input: text.clone(),
        });
        assert_eq!(SnowId::try_from(raw), expected);
        assert_eq!(text.parse::<SnowId>(), expected);
        assert_eq!(
            SnowId::try_from(SnowId::MAX_TIMESTAMP << SnowId::TIMESTAMP_SHIFT),
            Ok(SnowId::from_components(SnowId::MAX_TIMESTAMP, 0, 0))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn derived_serde_rejects_reserved_bit() {
        let id = SnowId::from_components(1, 2, 3);
        assert_eq!(serde_json::to_string(&id).unwrap(), id.to_raw().to_string());
        assert_eq!(serde_json::from_str::<SnowId>(&id.to_string()).unwrap(), id);

        let err = serde_json::from_str::<SnowId>("18446744073709551615").unwrap_err();
        assert!(err.to_string().contains("invalid identifier"));
    }

    #[test]
    fn debug_shows_fields() {
        let id = SnowId::from_components(1, 2, 3);
        let dbg = format!("{id:?}");
        assert!(dbg.contains("timestamp: 1"));
        assert!(dbg.contains("machine_id: 2"));
        assert!(dbg.contains("sequence: 3"));
    }
}
