use std::collections::HashMap;
use thiserror::Error;

use crate::model::{DifficultyRating, Problem, ProblemDraft, ProblemError, ProblemId};
use crate::recalibrate;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one problem")]
    Empty,

    #[error("duplicate problem id {0}")]
    DuplicateId(ProblemId),

    #[error("unknown problem id {0}")]
    UnknownProblem(ProblemId),

    #[error(transparent)]
    Problem(#[from] ProblemError),
}

/// Ordered, non-empty collection of problems.
///
/// Problems are addressed by position (what the selector returns) or by id.
/// Nothing is ever removed; the only mutation is difficulty recalibration.
#[derive(Debug, Clone)]
pub struct ProblemCatalog {
    problems: Vec<Problem>,
    positions: HashMap<ProblemId, usize>,
}

impl ProblemCatalog {
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::DuplicateId` when two problems share an id.
    pub fn new(problems: Vec<Problem>) -> Result<Self, CatalogError> {
        if problems.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut positions = HashMap::with_capacity(problems.len());
        for (index, problem) in problems.iter().enumerate() {
            if positions.insert(problem.id(), index).is_some() {
                return Err(CatalogError::DuplicateId(problem.id()));
            }
        }
        Ok(Self {
            problems,
            positions,
        })
    }

    /// Validate every draft, then build the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first `ProblemError` encountered, or any error from [`Self::new`].
    pub fn from_drafts(drafts: impl IntoIterator<Item = ProblemDraft>) -> Result<Self, CatalogError> {
        let problems = drafts
            .into_iter()
            .map(ProblemDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(problems)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Always false for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }

    #[must_use]
    pub fn index_of(&self, id: ProblemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[must_use]
    pub fn by_id(&self, id: ProblemId) -> Option<&Problem> {
        self.index_of(id).and_then(|index| self.problems.get(index))
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.problems.iter()
    }

    /// Fold a new rating into the stored difficulty of problem `id`.
    ///
    /// Every later selection reads the updated value, including selections
    /// made for other sessions sharing this catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownProblem` if `id` is not in the catalog.
    pub fn recalibrate(
        &mut self,
        id: ProblemId,
        rating: DifficultyRating,
    ) -> Result<f64, CatalogError> {
        let index = self
            .index_of(id)
            .ok_or(CatalogError::UnknownProblem(id))?;
        Ok(recalibrate::recalibrate(&mut self.problems[index], rating))
    }
}

impl<'a> IntoIterator for &'a ProblemCatalog {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}
