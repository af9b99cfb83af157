//! Problem catalogs and seed history.
//!
//! The catalog format is a JSON array of problems:
//!
//! ```json
//! [{ "id": 1, "statement": "...", "topic": "Algebra", "hints": ["..."], "difficulty": 4.5 }]
//! ```

use chrono::{DateTime, Utc};

use trainer_core::ProblemCatalog;
use trainer_core::model::{DifficultyRating, ProblemDraft, ProblemId, SolvedProblem};

use crate::error::CatalogLoadError;

const BUILTIN_CATALOG_JSON: &str = include_str!("../data/problems.json");

/// Parse and validate a JSON catalog.
///
/// # Errors
///
/// Returns `CatalogLoadError::Json` for malformed input and
/// `CatalogLoadError::Catalog` when a problem or the catalog fails validation.
pub fn parse_catalog_json(json: &str) -> Result<ProblemCatalog, CatalogLoadError> {
    let drafts: Vec<ProblemDraft> = serde_json::from_str(json)?;
    Ok(ProblemCatalog::from_drafts(drafts)?)
}

/// The eleven-problem catalog shipped with the trainer.
///
/// # Errors
///
/// Only fails if the bundled data is corrupt.
pub fn builtin_catalog() -> Result<ProblemCatalog, CatalogLoadError> {
    parse_catalog_json(BUILTIN_CATALOG_JSON)
}

// (problem id, seconds spent, rating, solved at unix seconds)
const DEMO_SOLVES: [(u64, u32, u8, i64); 7] = [
    (2, 320, 4, 1_721_469_600),
    (1, 650, 7, 1_721_561_400),
    (5, 210, 3, 1_721_638_800),
    (4, 800, 8, 1_721_663_100),
    (3, 450, 6, 1_721_743_200),
    (6, 512, 7, 1_721_844_000),
    (2, 180, 2, 1_721_902_800),
];

/// A week of made-up solves over the built-in catalog, so the progress view
/// and the weakness analysis have something to work with on first launch.
#[must_use]
pub fn demo_history() -> Vec<SolvedProblem> {
    DEMO_SOLVES
        .iter()
        .filter_map(|&(id, secs, rating, at)| {
            let rating = DifficultyRating::new(rating).ok()?;
            let solved_at = DateTime::<Utc>::from_timestamp(at, 0)?;
            Some(SolvedProblem::new(ProblemId::new(id), secs, rating, solved_at))
        })
        .collect()
}
