//! Difficulty recalibration.
//!
//! Each confirmed solve pulls the problem's stored difficulty halfway toward
//! the user's rating. Repeated ratings converge on the rating stream without
//! ever leaving the interval spanned by the old value and the new rating.

use tracing::debug;

use crate::model::{DifficultyRating, Problem};

/// Midpoint of the current difficulty and the new rating.
#[must_use]
pub fn recalibrated_difficulty(current: f64, rating: DifficultyRating) -> f64 {
    (current + rating.as_f64()) / 2.0
}

/// Apply a rating to `problem` and return its new difficulty.
pub fn recalibrate(problem: &mut Problem, rating: DifficultyRating) -> f64 {
    let previous = problem.difficulty();
    let updated = recalibrated_difficulty(previous, rating);
    problem.set_difficulty(updated);
    debug!(
        problem_id = %problem.id(),
        previous,
        rating = rating.value(),
        updated,
        "recalibrated problem difficulty"
    );
    updated
}
