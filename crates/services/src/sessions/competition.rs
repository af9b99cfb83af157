use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;
use tracing::info;

use trainer_core::{CatalogError, ProblemCatalog};
use trainer_core::model::{
    CompetitionSettings, DifficultyRating, Problem, ProblemId, SessionMode, SessionSummary,
    SolvedProblem,
};
use trainer_core::selector;

use crate::error::CompetitionError;
use crate::history::SolveHistory;
use crate::timer::Countdown;

/// Where a competition is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionPhase {
    /// Countdown running (or run out); slots can be marked solved.
    Active,
    /// Marked done with at least one solve; waiting for ratings.
    AwaitingRatings,
    /// Marked done with nothing solved. Nothing gets recorded.
    Abandoned,
    /// Ratings submitted and solves recorded.
    Submitted,
}

/// One problem of the batch and whether the user marked it solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompetitionSlot {
    pub index: usize,
    pub problem_id: ProblemId,
    pub solved: bool,
}

/// A timed competition over a fixed random batch.
///
/// No adaptive selection happens mid-session: the batch is drawn once, each
/// slot is ticked off independently, and all solved problems are rated
/// together at the end.
#[derive(Debug, Clone)]
pub struct CompetitionSession {
    settings: CompetitionSettings,
    slots: Vec<CompetitionSlot>,
    ratings: HashMap<ProblemId, DifficultyRating>,
    countdown: Countdown,
    phase: CompetitionPhase,
    recorded: Vec<SolvedProblem>,
    started_at: DateTime<Utc>,
}

impl CompetitionSession {
    /// Draw a batch and start the countdown.
    pub fn start<R: Rng>(
        catalog: &ProblemCatalog,
        settings: CompetitionSettings,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let slots = draw_slots(catalog, settings.problem_count(), rng);
        info!(
            problems = slots.len(),
            duration_secs = settings.duration_secs(),
            "competition started"
        );
        Self {
            settings,
            slots,
            ratings: HashMap::new(),
            countdown: Countdown::started(settings.duration_secs()),
            phase: CompetitionPhase::Active,
            recorded: Vec::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn phase(&self) -> CompetitionPhase {
        self.phase
    }

    #[must_use]
    pub fn slots(&self) -> &[CompetitionSlot] {
        &self.slots
    }

    #[must_use]
    pub fn settings(&self) -> &CompetitionSettings {
        &self.settings
    }

    /// Problems of the batch, in slot order.
    #[must_use]
    pub fn problems<'c>(&self, catalog: &'c ProblemCatalog) -> Vec<&'c Problem> {
        self.slots
            .iter()
            .filter_map(|slot| catalog.get(slot.index))
            .collect()
    }

    #[must_use]
    pub fn time_left_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    #[must_use]
    pub fn is_time_up(&self) -> bool {
        self.countdown.is_expired()
    }

    /// False once the countdown ran out or the batch was marked done.
    #[must_use]
    pub fn is_clock_running(&self) -> bool {
        self.countdown.is_running()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Solves recorded by `submit_ratings`.
    #[must_use]
    pub fn recorded(&self) -> &[SolvedProblem] {
        &self.recorded
    }

    /// One-second heartbeat. Returns `true` on the tick that runs out the clock.
    pub fn tick(&mut self) -> bool {
        let expired = self.countdown.tick();
        if expired {
            info!("competition time is up");
        }
        expired
    }

    /// Flip the solved mark of `slot` and return the new mark.
    ///
    /// # Errors
    ///
    /// `CompetitionError::NotActive` after the competition was marked done,
    /// `CompetitionError::NoSuchSlot` for an index outside the batch.
    pub fn toggle_solved(&mut self, slot: usize) -> Result<bool, CompetitionError> {
        self.ensure_phase(CompetitionPhase::Active, CompetitionError::NotActive)?;
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(CompetitionError::NoSuchSlot(slot))?;
        entry.solved = !entry.solved;
        Ok(entry.solved)
    }

    /// Throw the batch away, draw a new one and restart the countdown.
    ///
    /// # Errors
    ///
    /// `CompetitionError::NotActive` after the competition was marked done.
    pub fn regenerate<R: Rng>(
        &mut self,
        catalog: &ProblemCatalog,
        rng: &mut R,
    ) -> Result<(), CompetitionError> {
        self.ensure_phase(CompetitionPhase::Active, CompetitionError::NotActive)?;
        self.countdown.stop();
        self.slots = draw_slots(catalog, self.settings.problem_count(), rng);
        self.ratings.clear();
        self.countdown.restart();
        info!(problems = self.slots.len(), "competition regenerated");
        Ok(())
    }

    /// Stop the clock and close the batch.
    ///
    /// # Errors
    ///
    /// `CompetitionError::NotActive` if already marked done.
    pub fn mark_done(&mut self) -> Result<CompetitionPhase, CompetitionError> {
        self.ensure_phase(CompetitionPhase::Active, CompetitionError::NotActive)?;
        self.countdown.stop();
        self.phase = if self.slots.iter().any(|s| s.solved) {
            CompetitionPhase::AwaitingRatings
        } else {
            CompetitionPhase::Abandoned
        };
        info!(
            phase = ?self.phase,
            time_left_secs = self.countdown.remaining_secs(),
            "competition marked done"
        );
        Ok(self.phase)
    }

    /// Rate one of the solved problems. A later rating replaces an earlier one.
    ///
    /// # Errors
    ///
    /// `CompetitionError::NotAwaitingRatings` outside the rating phase,
    /// `CompetitionError::NotSolved` if `problem_id` is not a solved slot.
    pub fn set_rating(
        &mut self,
        problem_id: ProblemId,
        rating: DifficultyRating,
    ) -> Result<(), CompetitionError> {
        self.ensure_phase(
            CompetitionPhase::AwaitingRatings,
            CompetitionError::NotAwaitingRatings,
        )?;
        if !self
            .slots
            .iter()
            .any(|s| s.solved && s.problem_id == problem_id)
        {
            return Err(CompetitionError::NotSolved(problem_id));
        }
        self.ratings.insert(problem_id, rating);
        Ok(())
    }

    /// Rating that `submit_ratings` will use for `problem_id`.
    #[must_use]
    pub fn rating_for(&self, problem_id: ProblemId) -> DifficultyRating {
        self.ratings
            .get(&problem_id)
            .copied()
            .unwrap_or_else(|| self.settings.default_rating())
    }

    /// Recalibrate and record every solved problem.
    ///
    /// Each record gets the time used on the whole paper as its time spent.
    /// Unrated problems use the configured default rating.
    ///
    /// # Errors
    ///
    /// `CompetitionError::NotAwaitingRatings` unless the competition was marked
    /// done with at least one solve and not yet submitted.
    /// `CompetitionError::Catalog` if a solved problem is missing from
    /// `catalog`; nothing is recalibrated or recorded in that case.
    pub fn submit_ratings(
        &mut self,
        catalog: &mut ProblemCatalog,
        history: &mut SolveHistory,
        submitted_at: DateTime<Utc>,
    ) -> Result<&[SolvedProblem], CompetitionError> {
        self.ensure_phase(
            CompetitionPhase::AwaitingRatings,
            CompetitionError::NotAwaitingRatings,
        )?;
        let time_spent = self.countdown.elapsed_secs();

        let solved: Vec<(ProblemId, DifficultyRating)> = self
            .slots
            .iter()
            .filter(|s| s.solved)
            .map(|s| (s.problem_id, self.rating_for(s.problem_id)))
            .collect();

        // All or nothing: resolve every problem before touching the catalog.
        if let Some(&(missing, _)) = solved
            .iter()
            .find(|(problem_id, _)| catalog.index_of(*problem_id).is_none())
        {
            return Err(CatalogError::UnknownProblem(missing).into());
        }

        for (problem_id, rating) in solved {
            catalog.recalibrate(problem_id, rating)?;
            let record = SolvedProblem::new(problem_id, time_spent, rating, submitted_at);
            history.record(record.clone());
            self.recorded.push(record);
        }

        self.phase = CompetitionPhase::Submitted;
        info!(
            recorded = self.recorded.len(),
            time_spent_secs = time_spent,
            "competition ratings submitted"
        );
        Ok(&self.recorded)
    }

    /// Summary of what this competition recorded.
    ///
    /// # Errors
    ///
    /// Returns `CompetitionError::Summary` if `ended_at` precedes the start.
    pub fn summary(&self, ended_at: DateTime<Utc>) -> Result<SessionSummary, CompetitionError> {
        Ok(SessionSummary::from_solves(
            SessionMode::Competition,
            self.started_at,
            ended_at,
            &self.recorded,
        )?)
    }

    fn ensure_phase(
        &self,
        expected: CompetitionPhase,
        otherwise: CompetitionError,
    ) -> Result<(), CompetitionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(otherwise)
        }
    }
}

fn draw_slots<R: Rng>(catalog: &ProblemCatalog, count: usize, rng: &mut R) -> Vec<CompetitionSlot> {
    selector::sample_batch(catalog, count, rng)
        .into_iter()
        .filter_map(|index| {
            catalog.get(index).map(|problem| CompetitionSlot {
                index,
                problem_id: problem.id(),
                solved: false,
            })
        })
        .collect()
}
