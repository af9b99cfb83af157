use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{CompetitionSettingsError, ProblemError, RatingError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    CompetitionSettings(#[from] CompetitionSettingsError),
}
