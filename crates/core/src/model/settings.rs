use thiserror::Error;

use crate::model::rating::DifficultyRating;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompetitionSettingsError {
    #[error("competition duration must be > 0 seconds")]
    InvalidDuration,

    #[error("competition must contain at least one problem")]
    InvalidProblemCount,
}

/// Configuration for a timed competition session.
///
/// Defaults mirror an olympiad paper: three problems in four and a half hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompetitionSettings {
    duration_secs: u32,
    problem_count: usize,
    default_rating: DifficultyRating,
}

impl CompetitionSettings {
    pub const OLYMPIAD_DURATION_SECS: u32 = 4 * 3600 + 30 * 60;
    pub const OLYMPIAD_PROBLEM_COUNT: usize = 3;

    /// # Errors
    ///
    /// Returns `CompetitionSettingsError` if the duration or problem count is zero.
    pub fn new(
        duration_secs: u32,
        problem_count: usize,
        default_rating: DifficultyRating,
    ) -> Result<Self, CompetitionSettingsError> {
        if duration_secs == 0 {
            return Err(CompetitionSettingsError::InvalidDuration);
        }
        if problem_count == 0 {
            return Err(CompetitionSettingsError::InvalidProblemCount);
        }
        Ok(Self {
            duration_secs,
            problem_count,
            default_rating,
        })
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Number of problems drawn per batch. Capped by catalog size at draw time.
    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.problem_count
    }

    /// Rating applied to a solved problem the user did not rate.
    #[must_use]
    pub fn default_rating(&self) -> DifficultyRating {
        self.default_rating
    }
}

impl Default for CompetitionSettings {
    fn default() -> Self {
        Self {
            duration_secs: Self::OLYMPIAD_DURATION_SECS,
            problem_count: Self::OLYMPIAD_PROBLEM_COUNT,
            default_rating: DifficultyRating::default(),
        }
    }
}
