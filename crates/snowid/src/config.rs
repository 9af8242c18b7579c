use core::fmt;

use crate::{DEFAULT_EPOCH, Result, SnowId};
#[cfg(feature = "serde")]
use crate::MachineId;

/// Options recognised when building a [`UniqueIdGenerator`].
///
/// Every field is optional. With the `serde` feature the struct can be read
/// from any serde format; the camelCase names `customEpoch`, `machineID` and
/// `returnNumber` are accepted as aliases.
///
/// # Example
/// ```
/// use snowid::{GeneratorConfig, IdForm};
///
/// let config = GeneratorConfig::default()
///     .with_epoch(1_546_300_800_000)
///     .with_machine_id(7)
///     .with_return_numeric(true);
/// assert_eq!(config.form(), IdForm::Numeric);
/// ```
///
/// [`UniqueIdGenerator`]: crate::UniqueIdGenerator
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Epoch in milliseconds since the Unix epoch; [`DEFAULT_EPOCH`] when
    /// absent.
    #[cfg_attr(feature = "serde", serde(alias = "customEpoch"))]
    pub epoch: Option<i64>,

    /// Machine ID in `0..=4095`; drawn at random when absent.
    ///
    /// Deserialization validates the value like [`MachineId`] does, so a
    /// fractional number fails with [`Error::InvalidMachineId`].
    ///
    /// [`Error::InvalidMachineId`]: crate::Error::InvalidMachineId
    #[cfg_attr(
        feature = "serde",
        serde(
            alias = "machineID",
            alias = "machineId",
            deserialize_with = "deserialize_machine_id"
        )
    )]
    pub machine_id: Option<i64>,

    /// Whether callers want IDs as native integers rather than decimal
    /// strings.
    #[cfg_attr(feature = "serde", serde(alias = "returnNumber"))]
    pub return_numeric: bool,
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_epoch(mut self, epoch: i64) -> Self {
        self.epoch = Some(epoch);
        self
    }

    #[must_use]
    pub fn with_machine_id(mut self, machine_id: i64) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    #[must_use]
    pub fn with_return_numeric(mut self, return_numeric: bool) -> Self {
        self.return_numeric = return_numeric;
        self
    }

    /// The configured epoch, or [`DEFAULT_EPOCH`].
    pub fn epoch_or_default(&self) -> i64 {
        self.epoch.unwrap_or(DEFAULT_EPOCH)
    }

    pub fn form(&self) -> IdForm {
        if self.return_numeric {
            IdForm::Numeric
        } else {
            IdForm::Decimal
        }
    }
}

/// Accepts an integer, a whole float (JSON numbers) or integer text and
/// checks it with [`MachineId`].
#[cfg(feature = "serde")]
fn deserialize_machine_id<'de, D>(d: D) -> core::result::Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct MachineIdVisitor;

    impl MachineIdVisitor {
        fn accept<E: serde::de::Error>(machine_id: Result<MachineId>) -> Result<Option<i64>, E> {
            machine_id
                .map(|id| Some(i64::from(id.get())))
                .map_err(E::custom)
        }
    }

    impl<'de> Visitor<'de> for MachineIdVisitor {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a machine id in 0..=4095")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, d: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            d.deserialize_any(self)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Self::accept(MachineId::try_from(v))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Self::accept(MachineId::try_from(i64::try_from(v).unwrap_or(i64::MAX)))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Self::accept(MachineId::try_from(v))
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Self::accept(v.parse())
        }
    }

    d.deserialize_option(MachineIdVisitor)
}

/// How generated IDs are handed to callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdForm {
    /// As a native `u64`.
    Numeric,
    /// As a base-10 string, for consumers without lossless 64-bit integers.
    #[default]
    Decimal,
}

impl IdForm {
    /// Renders `id` in this form.
    pub fn render(self, id: SnowId) -> IdValue {
        match self {
            Self::Numeric => IdValue::Numeric(id.to_raw()),
            Self::Decimal => IdValue::Decimal(id.to_string()),
        }
    }
}

/// An ID rendered in one of the [`IdForm`]s.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdValue {
    Numeric(u64),
    Decimal(String),
}

impl IdValue {
    /// Converts back to a [`SnowId`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if the decimal form does not
    /// parse or if either form has the reserved bit set.
    ///
    /// [`Error::InvalidIdentifier`]: crate::Error::InvalidIdentifier
    pub fn to_snow_id(&self) -> Result<SnowId> {
        match self {
            Self::Numeric(raw) => SnowId::try_from(*raw),
            Self::Decimal(text) => text.parse(),
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(raw) => write!(f, "{raw}"),
            Self::Decimal(text) => f.write_str(text),
        }
    }
}
