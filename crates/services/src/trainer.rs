use rand::Rng;

use trainer_core::analysis;
use trainer_core::model::{
    CombinedHistory, CompetitionSettings, DifficultyRating, SessionSummary, Topic,
};
use trainer_core::selector::Selection;
use trainer_core::{Clock, ProblemCatalog};

use crate::error::{CompetitionError, SessionError};
use crate::history::SolveHistory;
use crate::progress::ProgressReport;
use crate::sessions::{CompetitionSession, EndlessSession, SolveOutcome};

/// Owns everything that outlives a single session and runs sessions over it.
///
/// Holds the catalog (whose difficulties drift as problems are rated), the
/// cross-session solve log, the clock and the random source. Only one session
/// is driven at a time; it is passed in by `&mut` on every call.
pub struct Trainer<R> {
    clock: Clock,
    catalog: ProblemCatalog,
    history: SolveHistory,
    competition: CompetitionSettings,
    rng: R,
}

impl<R: Rng> Trainer<R> {
    #[must_use]
    pub fn new(catalog: ProblemCatalog, rng: R) -> Self {
        Self {
            clock: Clock::default(),
            catalog,
            history: SolveHistory::new(),
            competition: CompetitionSettings::default(),
            rng,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: SolveHistory) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_competition_settings(mut self, settings: CompetitionSettings) -> Self {
        self.competition = settings;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &ProblemCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn history(&self) -> &SolveHistory {
        &self.history
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn competition_settings(&self) -> &CompetitionSettings {
        &self.competition
    }

    //
    // ─── ENDLESS ───────────────────────────────────────────────────────────────
    //

    pub fn start_endless(&mut self) -> EndlessSession {
        EndlessSession::start(&self.catalog, self.clock.now(), &mut self.rng)
    }

    /// Advance the session stopwatch and a fixed clock by one second.
    pub fn tick_endless(&mut self, session: &mut EndlessSession) {
        session.tick();
        self.clock.advance_secs(1);
    }

    /// Record a solve of the current problem and move to the next one.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from [`EndlessSession::on_solve`].
    pub fn solve(
        &mut self,
        session: &mut EndlessSession,
        rating: DifficultyRating,
    ) -> Result<(SolveOutcome, Selection), SessionError> {
        let outcome = session.on_solve(
            &mut self.catalog,
            &mut self.history,
            rating,
            self.clock.now(),
        )?;
        let selection = session.advance(&self.catalog, &self.history, &mut self.rng);
        Ok((outcome, selection))
    }

    /// Skip the current problem and move to the next one.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from [`EndlessSession::on_skip`].
    pub fn skip(&mut self, session: &mut EndlessSession) -> Result<Selection, SessionError> {
        session.on_skip()?;
        Ok(session.advance(&self.catalog, &self.history, &mut self.rng))
    }

    /// # Errors
    ///
    /// Propagates `SessionError` from [`EndlessSession::end`].
    pub fn end_endless(&self, session: EndlessSession) -> Result<SessionSummary, SessionError> {
        session.end(self.clock.now())
    }

    /// Weakest topic as the selector would see it for `session`.
    #[must_use]
    pub fn weakest_topic(&self, session: Option<&EndlessSession>) -> Option<Topic> {
        let session_log = session.map(EndlessSession::solved).unwrap_or_default();
        analysis::weakest_topic(
            &self.catalog,
            CombinedHistory::new(self.history.records(), session_log),
        )
    }

    //
    // ─── COMPETITION ───────────────────────────────────────────────────────────
    //

    pub fn start_competition(&mut self) -> CompetitionSession {
        CompetitionSession::start(
            &self.catalog,
            self.competition,
            self.clock.now(),
            &mut self.rng,
        )
    }

    /// Advance the countdown and a fixed clock by one second.
    ///
    /// Once the countdown has stopped, neither moves. Returns `true` on the
    /// tick that runs out the countdown.
    pub fn tick_competition(&mut self, session: &mut CompetitionSession) -> bool {
        if !session.is_clock_running() {
            return false;
        }
        self.clock.advance_secs(1);
        session.tick()
    }

    /// # Errors
    ///
    /// Propagates `CompetitionError` from [`CompetitionSession::regenerate`].
    pub fn regenerate_competition(
        &mut self,
        session: &mut CompetitionSession,
    ) -> Result<(), CompetitionError> {
        session.regenerate(&self.catalog, &mut self.rng)
    }

    /// Record the rated solves of a finished competition and summarise it.
    ///
    /// # Errors
    ///
    /// Propagates `CompetitionError` from [`CompetitionSession::submit_ratings`].
    pub fn submit_competition(
        &mut self,
        session: &mut CompetitionSession,
    ) -> Result<SessionSummary, CompetitionError> {
        let now = self.clock.now();
        session.submit_ratings(&mut self.catalog, &mut self.history, now)?;
        session.summary(now)
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn progress(&self) -> ProgressReport {
        ProgressReport::build(&self.catalog, self.history.records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use trainer_core::model::{LastAction, Problem, ProblemId};
    use trainer_core::selector::SelectionReason;
    use trainer_core::time::{fixed_clock, fixed_now};

    fn build_catalog() -> ProblemCatalog {
        ProblemCatalog::new(vec![
            Problem::new(ProblemId::new(1), "p1", "A", Vec::new(), 2.0).unwrap(),
            Problem::new(ProblemId::new(2), "p2", "A", Vec::new(), 8.0).unwrap(),
            Problem::new(ProblemId::new(3), "p3", "B", Vec::new(), 5.0).unwrap(),
        ])
        .unwrap()
    }

    fn trainer() -> Trainer<StdRng> {
        Trainer::new(build_catalog(), StdRng::seed_from_u64(21)).with_clock(fixed_clock())
    }

    #[test]
    fn ticks_advance_fixed_clock_and_time_spent() {
        let mut trainer = trainer();
        let mut session = trainer.start_endless();
        for _ in 0..30 {
            trainer.tick_endless(&mut session);
        }

        let (outcome, selection) = trainer
            .solve(&mut session, DifficultyRating::new(3).unwrap())
            .unwrap();

        assert_eq!(outcome.record.time_spent_secs(), 30);
        assert_eq!(
            outcome.record.solved_at(),
            fixed_now() + chrono::Duration::seconds(30)
        );
        assert!(matches!(
            selection.reason,
            SelectionReason::WeakestTopic(_) | SelectionReason::Fallback
        ));
        assert_eq!(session.last_action(), LastAction::None);
        assert_eq!(trainer.history().len(), 1);
    }

    #[test]
    fn skip_from_hardest_steps_to_middle() {
        let mut trainer = trainer();
        let mut session = trainer.start_endless();
        // Walk until the hardest problem (id 2) is current.
        while trainer.catalog().get(session.current_index()).unwrap().id() != ProblemId::new(2) {
            trainer.skip(&mut session).unwrap();
        }

        let selection = trainer.skip(&mut session).unwrap();
        assert_eq!(selection.reason, SelectionReason::EasierStep);
        assert_eq!(
            trainer.catalog().get(selection.index).unwrap().id(),
            ProblemId::new(3)
        );
    }

    #[test]
    fn ending_session_keeps_global_history() {
        let mut trainer = trainer();
        let mut session = trainer.start_endless();
        trainer
            .solve(&mut session, DifficultyRating::new(7).unwrap())
            .unwrap();
        trainer
            .solve(&mut session, DifficultyRating::new(2).unwrap())
            .unwrap();

        let summary = trainer.end_endless(session).unwrap();
        assert_eq!(summary.solved_count(), 2);
        assert_eq!(trainer.history().len(), 2);
        assert_eq!(trainer.progress().total_solved, 2);
    }

    #[test]
    fn weakest_topic_includes_session_solves() {
        let mut trainer = trainer();
        assert_eq!(trainer.weakest_topic(None), None);

        let mut session = trainer.start_endless();
        trainer
            .solve(&mut session, DifficultyRating::new(5).unwrap())
            .unwrap();
        assert!(trainer.weakest_topic(Some(&session)).is_some());
    }

    #[test]
    fn competition_round_trip_through_trainer() {
        let settings = CompetitionSettings::new(60, 2, DifficultyRating::default()).unwrap();
        let mut trainer = trainer().with_competition_settings(settings);
        let mut session = trainer.start_competition();
        assert_eq!(session.slots().len(), 2);

        for _ in 0..20 {
            trainer.tick_competition(&mut session);
        }
        session.toggle_solved(1).unwrap();
        session.mark_done().unwrap();

        let summary = trainer.submit_competition(&mut session).unwrap();
        assert_eq!(summary.solved_count(), 1);
        assert_eq!(summary.total_time_secs(), 20);
        assert_eq!(trainer.history().len(), 1);
    }

    #[test]
    fn ticks_after_done_leave_clock_alone() {
        let settings = CompetitionSettings::new(60, 2, DifficultyRating::default()).unwrap();
        let mut trainer = trainer().with_competition_settings(settings);
        let mut session = trainer.start_competition();

        for _ in 0..10 {
            trainer.tick_competition(&mut session);
        }
        session.toggle_solved(0).unwrap();
        session.mark_done().unwrap();
        for _ in 0..30 {
            assert!(!trainer.tick_competition(&mut session));
        }

        let summary = trainer.submit_competition(&mut session).unwrap();
        assert_eq!(
            summary.ended_at(),
            fixed_now() + chrono::Duration::seconds(10)
        );
        assert_eq!(summary.total_time_secs(), 10);
    }
}
