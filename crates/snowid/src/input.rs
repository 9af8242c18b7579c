//! Conversions accepted at the API boundary.
//!
//! Decode operations take anything that can become a [`SnowId`] (the type
//! itself, a raw `u64`, or its base-10 text) and `generate_for_timestamp`
//! takes anything that can become a Unix millisecond timestamp.

use crate::{Error, IdValue, Result, SnowId};

/// Values that identify an ID: [`SnowId`], `u64`, or base-10 text.
pub trait IntoSnowId {
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for text that is not a base-10
    /// `u64`, or for any value with the reserved bit set.
    fn into_snow_id(self) -> Result<SnowId>;
}

impl IntoSnowId for SnowId {
    fn into_snow_id(self) -> Result<SnowId> {
        Ok(self)
    }
}

impl IntoSnowId for u64 {
    fn into_snow_id(self) -> Result<SnowId> {
        SnowId::try_from(self)
    }
}

impl IntoSnowId for &str {
    fn into_snow_id(self) -> Result<SnowId> {
        self.parse()
    }
}

impl IntoSnowId for &String {
    fn into_snow_id(self) -> Result<SnowId> {
        self.parse()
    }
}

impl IntoSnowId for String {
    fn into_snow_id(self) -> Result<SnowId> {
        self.parse()
    }
}

impl IntoSnowId for &IdValue {
    fn into_snow_id(self) -> Result<SnowId> {
        self.to_snow_id()
    }
}

impl IntoSnowId for IdValue {
    fn into_snow_id(self) -> Result<SnowId> {
        self.to_snow_id()
    }
}

/// Values that denote a Unix timestamp in milliseconds: integers or base-10
/// text.
pub trait IntoTimestamp {
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] for text that is not a base-10
    /// integer, or for a `u64` beyond `i64::MAX`.
    fn into_timestamp(self) -> Result<i64>;
}

impl IntoTimestamp for i64 {
    fn into_timestamp(self) -> Result<i64> {
        Ok(self)
    }
}

impl IntoTimestamp for u64 {
    fn into_timestamp(self) -> Result<i64> {
        i64::try_from(self).map_err(|_| Error::InvalidTimestamp {
            input: self.to_string(),
        })
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<i64> {
        self.trim().parse().map_err(|_| Error::InvalidTimestamp {
            input: self.to_owned(),
        })
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Result<i64> {
        self.as_str().into_timestamp()
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Result<i64> {
        self.as_str().into_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_from_every_representation() {
        let id = SnowId::from_components(9, 8, 7);
        let text = id.to_string();
        assert_eq!(id.into_snow_id(), Ok(id));
        assert_eq!(id.to_raw().into_snow_id(), Ok(id));
        assert_eq!(text.as_str().into_snow_id(), Ok(id));
        assert_eq!((&text).into_snow_id(), Ok(id));
        assert_eq!(text.into_snow_id(), Ok(id));
        assert_eq!(IdValue::Numeric(id.to_raw()).into_snow_id(), Ok(id));
    }

    #[test]
    fn reserved_bit_fails_the_same_way_in_every_representation() {
        let raw = SnowId::RESERVED_MASK | SnowId::from_components(123, 7, 0).to_raw();
        let expected = Err(Error::InvalidIdentifier {
            input: raw.to_string(),
        });
        assert_eq!(raw.into_snow_id(), expected);
        assert_eq!(raw.to_string().into_snow_id(), expected);
        assert_eq!(raw.to_string().as_str().into_snow_id(), expected);
        assert_eq!(IdValue::Numeric(raw).into_snow_id(), expected);
        assert_eq!(IdValue::Decimal(raw.to_string()).into_snow_id(), expected);
    }

    #[test]
    fn timestamps_from_every_representation() {
        assert_eq!(1_546_300_800_123i64.into_timestamp(), Ok(1_546_300_800_123));
        assert_eq!(1_546_300_800_123u64.into_timestamp(), Ok(1_546_300_800_123));
        assert_eq!("1546300800123".into_timestamp(), Ok(1_546_300_800_123));
        assert_eq!("-5".into_timestamp(), Ok(-5));
        assert_eq!(
            "12.5".into_timestamp(),
            Err(Error::InvalidTimestamp {
                input: "12.5".to_owned()
            })
        );
        assert!(matches!(
            u64::MAX.into_timestamp(),
            Err(Error::InvalidTimestamp { .. })
        ));
    }
}
