use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value has the reserved bit set
    pub fn deserialize<'de, D>(d: D) -> Result<SnowId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        SnowId::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// (De)serialize an ID as a base-10 string, for consumers whose numbers
/// cannot hold 64 bits losslessly (e.g. JavaScript).
///
/// Deserialization also accepts a native integer.
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod as_decimal {
    use super::{Deserializer, Serializer};
    use crate::{Error, SnowId};
    use core::fmt;

    /// Serialize an ID as a base-10 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from a base-10 string or an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a base-10 `u64`
    /// - The value has the reserved bit set
    pub fn deserialize<'de, D>(d: D) -> Result<SnowId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a base-10 ID string or integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                SnowId::try_from(v).map_err(E::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v)
                    .map_err(|_| {
                        E::custom(Error::InvalidIdentifier {
                            input: v.to_string(),
                        })
                    })
                    .and_then(|raw| self.visit_u64(raw))
            }
        }

        d.deserialize_any(DecimalVisitor)
    }
}
