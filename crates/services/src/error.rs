//! Shared error types for the services crate.

use thiserror::Error;

use trainer_core::CatalogError;
use trainer_core::model::{ProblemId, SessionSummaryError};

/// Errors emitted by the hint reveal gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HintError {
    #[error("previous hint is still being revealed")]
    RevealInProgress,
    #[error("no more hints for this problem")]
    Exhausted,
}

/// Errors emitted by endless sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("current problem index {0} is not in the catalog")]
    NoCurrentProblem(usize),
    #[error("current problem was already answered; advance first")]
    AwaitingAdvance,
    #[error(transparent)]
    Hint(#[from] HintError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted by competition sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompetitionError {
    #[error("competition is no longer running")]
    NotActive,
    #[error("competition has not been marked done")]
    NotAwaitingRatings,
    #[error("no problem in slot {0}")]
    NoSuchSlot(usize),
    #[error("problem {0} is not a solved problem of this competition")]
    NotSolved(ProblemId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted while loading a problem catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
