use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::solved::SolvedProblem;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,

    #[error("too many solves for a single session: {len}")]
    TooManySolves { len: usize },
}

//
// ─── LAST ACTION ───────────────────────────────────────────────────────────────
//

/// What the user did with the problem that was on screen.
///
/// The selector reads this once when choosing the next problem; afterwards
/// it goes back to `None` until the next solve or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LastAction {
    #[default]
    None,
    Solved,
    Skipped,
}

//
// ─── SESSION MODE ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionMode {
    /// One problem at a time, next one picked adaptively.
    Endless,
    /// Fixed batch under a countdown, rated in bulk at the end.
    Competition,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Endless => f.write_str("endless"),
            SessionMode::Competition => f.write_str("competition"),
        }
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Adaptive-session state that feeds back into the selector.
///
/// The solved log only grows; the whole state is dropped when the session ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    current_index: usize,
    last_action: LastAction,
    solved: Vec<SolvedProblem>,
}

impl SessionState {
    #[must_use]
    pub fn new(current_index: usize) -> Self {
        Self {
            current_index,
            last_action: LastAction::None,
            solved: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn last_action(&self) -> LastAction {
        self.last_action
    }

    #[must_use]
    pub fn solved(&self) -> &[SolvedProblem] {
        &self.solved
    }

    /// Append a confirmed solve and flag it for the next selection.
    pub fn record_solve(&mut self, record: SolvedProblem) {
        self.solved.push(record);
        self.last_action = LastAction::Solved;
    }

    pub fn record_skip(&mut self) {
        self.last_action = LastAction::Skipped;
    }

    /// Move to `next_index` and clear the action flag.
    pub fn advance_to(&mut self, next_index: usize) {
        self.current_index = next_index;
        self.last_action = LastAction::None;
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Figures read off a session right before its log is discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    mode: SessionMode,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    solved_count: u32,
    total_time_secs: u64,
    average_rating: Option<f64>,
}

impl SessionSummary {
    /// Build a summary from the session's solved log.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `ended_at` is before `started_at`.
    /// Returns `SessionSummaryError::TooManySolves` if the log count cannot fit in `u32`.
    pub fn from_solves(
        mode: SessionMode,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        solves: &[SolvedProblem],
    ) -> Result<Self, SessionSummaryError> {
        if ended_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let solved_count = u32::try_from(solves.len())
            .map_err(|_| SessionSummaryError::TooManySolves { len: solves.len() })?;

        let total_time_secs = solves
            .iter()
            .map(|s| u64::from(s.time_spent_secs()))
            .sum();

        let average_rating = if solves.is_empty() {
            None
        } else {
            let total: f64 = solves.iter().map(|s| s.rating().as_f64()).sum();
            Some(total / f64::from(solved_count))
        };

        Ok(Self {
            mode,
            started_at,
            ended_at,
            solved_count,
            total_time_secs,
            average_rating,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[must_use]
    pub fn solved_count(&self) -> u32 {
        self.solved_count
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u64 {
        self.total_time_secs
    }

    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        self.average_rating
    }
}
