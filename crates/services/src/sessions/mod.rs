mod competition;
mod endless;

// Public API of the session subsystem.
pub use crate::error::{CompetitionError, SessionError};
pub use competition::{CompetitionPhase, CompetitionSession, CompetitionSlot};
pub use endless::{EndlessSession, SolveOutcome};
