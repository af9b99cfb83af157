use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use tracing::{debug, info};

use trainer_core::ProblemCatalog;
use trainer_core::model::{
    CombinedHistory, DifficultyRating, LastAction, Problem, SessionMode, SessionState,
    SessionSummary, SolvedProblem,
};
use trainer_core::selector::{self, Selection};

use crate::error::SessionError;
use crate::hints::HintReveal;
use crate::history::SolveHistory;
use crate::timer::Stopwatch;

//
// ─── SOLVE OUTCOME ─────────────────────────────────────────────────────────────
//

/// What a confirmed solve changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub record: SolvedProblem,
    pub previous_difficulty: f64,
    pub new_difficulty: f64,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// An endless training session.
///
/// Shows one problem at a time. Each solve or skip is recorded here, then
/// `advance` asks the selector for the next problem. The session's own solve
/// log lives only as long as the session; confirmed solves are also pushed to
/// the shared [`SolveHistory`].
pub struct EndlessSession {
    state: SessionState,
    stopwatch: Stopwatch,
    hints: HintReveal,
    started_at: DateTime<Utc>,
}

impl EndlessSession {
    /// Start a session on a uniformly random problem.
    pub fn start<R: Rng>(catalog: &ProblemCatalog, started_at: DateTime<Utc>, rng: &mut R) -> Self {
        let first = selector::initial_index(catalog, rng);
        info!(first_index = first, %started_at, "endless session started");
        Self {
            state: SessionState::new(first),
            stopwatch: Stopwatch::started(),
            hints: HintReveal::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    #[must_use]
    pub fn current_problem<'c>(&self, catalog: &'c ProblemCatalog) -> Option<&'c Problem> {
        catalog.get(self.state.current_index())
    }

    #[must_use]
    pub fn last_action(&self) -> LastAction {
        self.state.last_action()
    }

    /// Solves confirmed during this session, oldest first.
    #[must_use]
    pub fn solved(&self) -> &[SolvedProblem] {
        self.state.solved()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seconds spent on the current problem.
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.stopwatch.elapsed_secs()
    }

    #[must_use]
    pub fn hints(&self) -> &HintReveal {
        &self.hints
    }

    /// One-second heartbeat.
    pub fn tick(&mut self) {
        self.stopwatch.tick();
    }

    /// Unlock the next hint for the current problem.
    ///
    /// # Errors
    ///
    /// `SessionError::Hint` when the gate refuses, `SessionError::NoCurrentProblem`
    /// if the current index is not in `catalog`.
    pub fn request_hint<'c>(&mut self, catalog: &'c ProblemCatalog) -> Result<&'c str, SessionError> {
        let problem = self
            .current_problem(catalog)
            .ok_or(SessionError::NoCurrentProblem(self.current_index()))?;
        Ok(self.hints.request(problem)?)
    }

    pub fn finish_hint_reveal(&mut self) {
        self.hints.finish_reveal();
    }

    /// Confirm the current problem as solved with the user's `rating`.
    ///
    /// Recalibrates the problem in `catalog`, appends the record to both
    /// `history` and this session, and flags the solve for the next selection.
    ///
    /// # Errors
    ///
    /// `SessionError::AwaitingAdvance` if the current problem was already
    /// solved or skipped, `SessionError::NoCurrentProblem` if the current
    /// index is not in `catalog`.
    pub fn on_solve(
        &mut self,
        catalog: &mut ProblemCatalog,
        history: &mut SolveHistory,
        rating: DifficultyRating,
        solved_at: DateTime<Utc>,
    ) -> Result<SolveOutcome, SessionError> {
        self.ensure_unanswered()?;
        let index = self.current_index();
        let problem_id = catalog
            .get(index)
            .map(Problem::id)
            .ok_or(SessionError::NoCurrentProblem(index))?;
        let previous_difficulty = catalog
            .get(index)
            .map_or(0.0, Problem::difficulty);

        let new_difficulty = catalog.recalibrate(problem_id, rating)?;
        self.stopwatch.stop();

        let record = SolvedProblem::new(
            problem_id,
            self.stopwatch.elapsed_secs(),
            rating,
            solved_at,
        );
        history.record(record.clone());
        self.state.record_solve(record.clone());

        info!(
            %problem_id,
            rating = rating.value(),
            time_spent_secs = record.time_spent_secs(),
            "problem solved"
        );

        Ok(SolveOutcome {
            record,
            previous_difficulty,
            new_difficulty,
        })
    }

    /// Give up on the current problem. Nothing is recorded.
    ///
    /// # Errors
    ///
    /// `SessionError::AwaitingAdvance` if the current problem was already answered.
    pub fn on_skip(&mut self) -> Result<(), SessionError> {
        self.ensure_unanswered()?;
        self.stopwatch.stop();
        self.state.record_skip();
        debug!(current_index = self.current_index(), "problem skipped");
        Ok(())
    }

    /// Pick the next problem based on the last action and move to it.
    ///
    /// The stopwatch and hint gate start over for the new problem.
    pub fn advance<R: Rng>(
        &mut self,
        catalog: &ProblemCatalog,
        history: &SolveHistory,
        rng: &mut R,
    ) -> Selection {
        let combined = CombinedHistory::new(history.records(), self.state.solved());
        let selection = selector::select_next(
            catalog,
            self.state.current_index(),
            self.state.last_action(),
            combined,
            rng,
        );
        self.state.advance_to(selection.index);
        self.stopwatch.restart();
        self.hints.reset();
        selection
    }

    /// Close the session and return its summary.
    ///
    /// The session log is dropped with `self`; the shared history keeps every
    /// solve already confirmed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if `ended_at` precedes the start.
    pub fn end(self, ended_at: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        let summary = SessionSummary::from_solves(
            SessionMode::Endless,
            self.started_at,
            ended_at,
            self.state.solved(),
        )?;
        info!(
            solved = summary.solved_count(),
            total_time_secs = summary.total_time_secs(),
            "endless session ended"
        );
        Ok(summary)
    }

    fn ensure_unanswered(&self) -> Result<(), SessionError> {
        if self.state.last_action() == LastAction::None {
            Ok(())
        } else {
            Err(SessionError::AwaitingAdvance)
        }
    }
}

impl fmt::Debug for EndlessSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndlessSession")
            .field("current_index", &self.state.current_index())
            .field("last_action", &self.state.last_action())
            .field("solved_len", &self.state.solved().len())
            .field("elapsed_secs", &self.stopwatch.elapsed_secs())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
