use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("difficulty rating must be between 1 and 10, got {0}")]
    OutOfRange(u8),
}

/// A user's self-reported difficulty for a solve, on a 1–10 star scale.
///
/// Distinct from a problem's difficulty: the rating is a one-off judgement,
/// the difficulty is the running estimate it feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DifficultyRating(u8);

impl DifficultyRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` outside `1..=10`.
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for DifficultyRating {
    /// Mid-scale rating, used when a competition solve is left unrated.
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for DifficultyRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DifficultyRating> for u8 {
    fn from(value: DifficultyRating) -> Self {
        value.0
    }
}

impl fmt::Display for DifficultyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}
