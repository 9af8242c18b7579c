use core::{fmt, num::IntErrorKind, str::FromStr};

use crate::{Error, RandSource, Result, SnowId};

/// A validated 12-bit machine (node) identifier in `0..=4095`.
///
/// The value is fixed once a generator is built and is encoded into every ID
/// that generator produces. Keeping machine IDs distinct across a fleet is the
/// caller's job.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MachineId(u16);

impl MachineId {
    /// Largest valid machine ID (`2^12 - 1`).
    pub const MAX: u16 = SnowId::MAX_MACHINE_ID as u16;

    /// Validates `value`, failing with [`Error::MachineIdOutOfRange`] above
    /// [`Self::MAX`].
    pub fn new(value: u16) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::MachineIdOutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Draws a machine ID uniformly from `0..=4095`.
    pub fn random(rng: &impl RandSource<u16>) -> Self {
        Self(rng.rand() & Self::MAX)
    }

    /// Uses `candidate` when present, otherwise assigns a random ID.
    ///
    /// Only `None` counts as absent; any supplied value must be in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MachineIdOutOfRange`] for negative values or values
    /// above [`Self::MAX`].
    ///
    /// # Example
    /// ```
    /// use snowid::{MachineId, ThreadRandom};
    ///
    /// assert_eq!(MachineId::resolve(Some(7), &ThreadRandom).unwrap().get(), 7);
    /// assert!(MachineId::resolve(None, &ThreadRandom).unwrap().get() <= MachineId::MAX);
    /// assert!(MachineId::resolve(Some(4096), &ThreadRandom).is_err());
    /// ```
    pub fn resolve(candidate: Option<i64>, rng: &impl RandSource<u16>) -> Result<Self> {
        match candidate {
            Some(value) => Self::try_from(value),
            None => Ok(Self::random(rng)),
        }
    }

    /// Returns the raw value.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for MachineId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u16::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(Error::MachineIdOutOfRange { value })
    }
}

impl TryFrom<f64> for MachineId {
    type Error = Error;

    /// Accepts only finite, integral values (e.g. from JSON numbers).
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(Error::InvalidMachineId {
                input: value.to_string(),
            });
        }
        if value < 0.0 || value > f64::from(Self::MAX) {
            // Saturating cast; only used for the error payload.
            return Err(Error::MachineIdOutOfRange {
                value: value as i64,
            });
        }
        Ok(Self(value as u16))
    }
}

impl FromStr for MachineId {
    type Err = Error;

    /// Accepts base-10 integer text only; `"3.5"` and `"1e3"` are rejected.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(value) => Self::try_from(value),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Err(Error::MachineIdOutOfRange { value: i64::MAX }),
                IntErrorKind::NegOverflow => Err(Error::MachineIdOutOfRange { value: i64::MIN }),
                _ => Err(Error::InvalidMachineId {
                    input: s.to_owned(),
                }),
            },
        }
    }
}

impl From<MachineId> for u16 {
    fn from(id: MachineId) -> Self {
        id.0
    }
}

impl From<MachineId> for u64 {
    fn from(id: MachineId) -> Self {
        u64::from(id.0)
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRand(u16);

    impl RandSource<u16> for FixedRand {
        fn rand(&self) -> u16 {
            self.0
        }
    }

    #[test]
    fn accepts_boundaries() {
        assert_eq!(MachineId::try_from(0i64).map(MachineId::get), Ok(0));
        assert_eq!(MachineId::try_from(4095i64).map(MachineId::get), Ok(4095));
        assert_eq!(MachineId::new(4095).map(MachineId::get), Ok(4095));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            MachineId::try_from(4096i64),
            Err(Error::MachineIdOutOfRange { value: 4096 })
        );
        assert_eq!(
            MachineId::try_from(-1i64),
            Err(Error::MachineIdOutOfRange { value: -1 })
        );
        assert_eq!(
            MachineId::new(u16::MAX),
            Err(Error::MachineIdOutOfRange {
                value: i64::from(u16::MAX)
            })
        );
    }

    #[test]
    fn rejects_fractional_values() {
        assert!(matches!(
            MachineId::try_from(3.5),
            Err(Error::InvalidMachineId { .. })
        ));
        assert!(matches!(
            MachineId::try_from(f64::NAN),
            Err(Error::InvalidMachineId { .. })
        ));
        assert!(matches!(
            MachineId::try_from(f64::INFINITY),
            Err(Error::InvalidMachineId { .. })
        ));
        assert_eq!(MachineId::try_from(12.0).map(MachineId::get), Ok(12));
        assert_eq!(
            MachineId::try_from(4096.0),
            Err(Error::MachineIdOutOfRange { value: 4096 })
        );
    }

    #[test]
    fn parses_text() {
        assert_eq!("7".parse::<MachineId>().map(MachineId::get), Ok(7));
        assert_eq!(" 4095 ".parse::<MachineId>().map(MachineId::get), Ok(4095));
        assert!(matches!(
            "3.5".parse::<MachineId>(),
            Err(Error::InvalidMachineId { .. })
        ));
        assert!(matches!(
            "".parse::<MachineId>(),
            Err(Error::InvalidMachineId { .. })
        ));
        assert!(matches!(
            "NaN".parse::<MachineId>(),
            Err(Error::InvalidMachineId { .. })
        ));
        assert_eq!(
            "4096".parse::<MachineId>(),
            Err(Error::MachineIdOutOfRange { value: 4096 })
        );
        assert_eq!(
            "99999999999999999999".parse::<MachineId>(),
            Err(Error::MachineIdOutOfRange { value: i64::MAX })
        );
    }

    #[test]
    fn text_must_be_an_integer() {
        for input in ["1e3", "4.095e3", "12.0", "0x10", "inf"] {
            assert_eq!(
                input.parse::<MachineId>(),
                Err(Error::InvalidMachineId {
                    input: input.to_owned()
                })
            );
        }
    }

    #[test]
    fn resolve_uses_candidate_or_random() {
        assert_eq!(
            MachineId::resolve(Some(42), &FixedRand(9)).map(MachineId::get),
            Ok(42)
        );
        assert_eq!(
            MachineId::resolve(None, &FixedRand(9)).map(MachineId::get),
            Ok(9)
        );
        // Random draws are folded into 12 bits.
        assert_eq!(
            MachineId::resolve(None, &FixedRand(u16::MAX)).map(MachineId::get),
            Ok(4095)
        );
        assert!(MachineId::resolve(Some(-3), &FixedRand(0)).is_err());
    }

    #[test]
    fn random_machine_ids_stay_in_range() {
        for _ in 0..1_000 {
            assert!(MachineId::random(&crate::ThreadRandom).get() <= MachineId::MAX);
        }
    }
}
