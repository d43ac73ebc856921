use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Highest raw score on the Listening and Reading papers.
pub const MAX_RAW_SCORE: u8 = 40;

/// IELTS band in half-point steps between 1.0 and 9.0.
///
/// The value is held as a count of half points (2..=18) so averaging and
/// weighting stay exact integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BandScore(u8);

impl BandScore {
    pub const MIN: Self = Self(2);
    pub const MAX: Self = Self(18);

    pub fn new(value: f64) -> Result<Self, BandScoreError> {
        if !value.is_finite() {
            return Err(BandScoreError::NotFinite);
        }
        if !(1.0..=9.0).contains(&value) {
            return Err(BandScoreError::OutOfRange { value });
        }

        let doubled = value * 2.0;
        if doubled.fract() != 0.0 {
            return Err(BandScoreError::NotHalfStep { value });
        }

        Ok(Self(doubled as u8))
    }

    /// Callers guarantee `half_points` lies in 2..=18.
    pub(crate) fn from_half_points(half_points: u8) -> Self {
        debug_assert!(
            (Self::MIN.0..=Self::MAX.0).contains(&half_points),
            "band half points {half_points} outside 2..=18"
        );
        Self(half_points)
    }

    pub const fn half_points(self) -> u8 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl fmt::Display for BandScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

impl TryFrom<f64> for BandScore {
    type Error = BandScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for BandScore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for BandScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BandScoreError {
    #[error("band score must be a finite number")]
    NotFinite,
    #[error("band score {value} is outside 1.0 - 9.0")]
    OutOfRange { value: f64 },
    #[error("band score {value} is not a multiple of 0.5")]
    NotHalfStep { value: f64 },
}

/// Count of correct answers on a 40-question paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RawScore(u8);

impl RawScore {
    pub fn new(value: u8) -> Result<Self, RawScoreError> {
        if value > MAX_RAW_SCORE {
            return Err(RawScoreError::OutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RawScore {
    type Error = RawScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|raw| *raw <= MAX_RAW_SCORE)
            .map(Self)
            .ok_or(RawScoreError::OutOfRange { value })
    }
}

impl fmt::Display for RawScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RawScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RawScoreError {
    #[error("raw score {value} is outside 0 - 40")]
    OutOfRange { value: i64 },
}
