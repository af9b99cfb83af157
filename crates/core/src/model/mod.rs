mod ids;
mod problem;
mod rating;
mod session;
mod settings;
mod solved;

pub use ids::{ParseIdError, ProblemId};
pub use problem::{MAX_HINTS, Problem, ProblemDraft, ProblemError, Topic};
pub use rating::{DifficultyRating, RatingError};
pub use session::{LastAction, SessionMode, SessionState, SessionSummary, SessionSummaryError};
pub use settings::{CompetitionSettings, CompetitionSettingsError};
pub use solved::{CombinedHistory, SolvedProblem};
