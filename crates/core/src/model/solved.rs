use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ProblemId;
use crate::model::rating::DifficultyRating;

/// Record of one confirmed solve.
///
/// Records refer to the problem by id rather than holding a copy, so any
/// aggregate over them sees the problem's *current* difficulty. They are never
/// edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedProblem {
    problem_id: ProblemId,
    time_spent_secs: u32,
    rating: DifficultyRating,
    solved_at: DateTime<Utc>,
}

impl SolvedProblem {
    #[must_use]
    pub fn new(
        problem_id: ProblemId,
        time_spent_secs: u32,
        rating: DifficultyRating,
        solved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            problem_id,
            time_spent_secs,
            rating,
            solved_at,
        }
    }

    #[must_use]
    pub fn problem_id(&self) -> ProblemId {
        self.problem_id
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.time_spent_secs
    }

    #[must_use]
    pub fn rating(&self) -> DifficultyRating {
        self.rating
    }

    #[must_use]
    pub fn solved_at(&self) -> DateTime<Utc> {
        self.solved_at
    }
}

/// The cross-session log and the active session's log, viewed together.
///
/// Both halves stay separate append-only sequences owned elsewhere; this is
/// only a borrowed window over them. Iteration yields the global log first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombinedHistory<'a> {
    global: &'a [SolvedProblem],
    session: &'a [SolvedProblem],
}

impl<'a> CombinedHistory<'a> {
    #[must_use]
    pub fn new(global: &'a [SolvedProblem], session: &'a [SolvedProblem]) -> Self {
        Self { global, session }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SolvedProblem> + 'a {
        self.global.iter().chain(self.session.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.global.len() + self.session.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.session.is_empty()
    }
}
