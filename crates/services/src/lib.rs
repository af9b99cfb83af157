#![forbid(unsafe_code)]

pub mod catalog_source;
pub mod error;
pub mod hints;
pub mod history;
pub mod progress;
pub mod sessions;
pub mod timer;
pub mod trainer;

pub use trainer_core::Clock;

pub use catalog_source::{builtin_catalog, demo_history, parse_catalog_json};
pub use error::{CatalogLoadError, CompetitionError, HintError, SessionError};
pub use hints::HintReveal;
pub use history::SolveHistory;
pub use progress::{ProgressReport, TopicCount, TopicRating};
pub use sessions::{
    CompetitionPhase, CompetitionSession, CompetitionSlot, EndlessSession, SolveOutcome,
};
pub use timer::{Countdown, Stopwatch};
pub use trainer::Trainer;
