use trainer_core::model::{MAX_HINTS, Problem};

use crate::error::HintError;

/// Gate for graduated hints on the current problem.
///
/// Hints come out one at a time. A new hint can only be requested once the
/// collaborator reports that the previous one finished revealing, and never
/// more than the problem has (at most three).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintReveal {
    revealed: usize,
    typing: bool,
}

impl HintReveal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock the next hint of `problem` and start revealing it.
    ///
    /// # Errors
    ///
    /// `HintError::RevealInProgress` while the previous hint is still typing,
    /// `HintError::Exhausted` once every hint has been shown.
    pub fn request<'p>(&mut self, problem: &'p Problem) -> Result<&'p str, HintError> {
        if self.typing {
            return Err(HintError::RevealInProgress);
        }
        if self.revealed >= Self::available(problem) {
            return Err(HintError::Exhausted);
        }
        let hint = problem.hint(self.revealed + 1).ok_or(HintError::Exhausted)?;
        self.revealed += 1;
        self.typing = true;
        Ok(hint)
    }

    /// Called when the reveal animation of the latest hint completes.
    pub fn finish_reveal(&mut self) {
        self.typing = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    #[must_use]
    pub fn can_request(&self, problem: &Problem) -> bool {
        !self.typing && self.revealed < Self::available(problem)
    }

    /// Hints unlocked so far, in order.
    #[must_use]
    pub fn visible<'p>(&self, problem: &'p Problem) -> &'p [String] {
        let hints = problem.hints();
        &hints[..self.revealed.min(hints.len())]
    }

    fn available(problem: &Problem) -> usize {
        problem.hints().len().min(MAX_HINTS)
    }
}
