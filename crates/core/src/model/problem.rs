use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::ProblemId;

/// Maximum number of graduated hints a problem may carry.
pub const MAX_HINTS: usize = 3;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProblemError {
    #[error("problem {id}: statement cannot be empty")]
    EmptyStatement { id: ProblemId },

    #[error("problem {id}: topic cannot be empty")]
    EmptyTopic { id: ProblemId },

    #[error("problem {id}: at most {MAX_HINTS} hints allowed, got {count}")]
    TooManyHints { id: ProblemId, count: usize },

    #[error("problem {id}: difficulty must be finite and non-negative, got {provided}")]
    InvalidDifficulty { id: ProblemId, provided: f64 },
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// Subject-matter label of a problem, e.g. "Geometry" or "Number Theory".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// Unvalidated problem as handed over by a catalog loader.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProblemDraft {
    pub id: ProblemId,
    pub statement: String,
    pub topic: String,
    #[serde(default)]
    pub hints: Vec<String>,
    pub difficulty: f64,
}

impl ProblemDraft {
    /// Validate the draft into a catalog problem.
    ///
    /// Statement and topic are trimmed; blank hints are dropped before the
    /// hint cap is checked.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError` when the statement or topic is blank, more than
    /// three hints remain, or the difficulty is negative or not finite.
    pub fn validate(self) -> Result<Problem, ProblemError> {
        let id = self.id;
        let statement = self.statement.trim().to_string();
        if statement.is_empty() {
            return Err(ProblemError::EmptyStatement { id });
        }
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(ProblemError::EmptyTopic { id });
        }
        let hints: Vec<String> = self
            .hints
            .into_iter()
            .map(|hint| hint.trim().to_string())
            .filter(|hint| !hint.is_empty())
            .collect();
        if hints.len() > MAX_HINTS {
            return Err(ProblemError::TooManyHints {
                id,
                count: hints.len(),
            });
        }
        if !self.difficulty.is_finite() || self.difficulty < 0.0 {
            return Err(ProblemError::InvalidDifficulty {
                id,
                provided: self.difficulty,
            });
        }

        Ok(Problem {
            id,
            statement,
            topic: Topic::new(topic),
            hints,
            difficulty: self.difficulty,
        })
    }
}

/// A catalog problem.
///
/// Everything except `difficulty` is fixed at load time; the difficulty is
/// rewritten by the recalibrator each time someone solves the problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    id: ProblemId,
    statement: String,
    topic: Topic,
    hints: Vec<String>,
    difficulty: f64,
}

impl Problem {
    /// Convenience constructor for code-defined catalogs.
    ///
    /// # Errors
    ///
    /// See [`ProblemDraft::validate`].
    pub fn new(
        id: ProblemId,
        statement: impl Into<String>,
        topic: impl Into<String>,
        hints: Vec<String>,
        difficulty: f64,
    ) -> Result<Self, ProblemError> {
        ProblemDraft {
            id,
            statement: statement.into(),
            topic: topic.into(),
            hints,
            difficulty,
        }
        .validate()
    }

    #[must_use]
    pub fn id(&self) -> ProblemId {
        self.id
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Returns the hint at `level` (1-based), if the problem has one.
    #[must_use]
    pub fn hint(&self, level: usize) -> Option<&str> {
        level
            .checked_sub(1)
            .and_then(|idx| self.hints.get(idx))
            .map(String::as_str)
    }

    #[must_use]
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub(crate) fn set_difficulty(&mut self, difficulty: f64) {
        self.difficulty = difficulty;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
