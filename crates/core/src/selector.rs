use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::debug;

use crate::analysis::weakest_topic;
use crate::catalog::ProblemCatalog;
use crate::model::{CombinedHistory, LastAction, Topic};

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Which rule produced a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionReason {
    /// After a solve: closest difficulty within the weakest topic.
    WeakestTopic(Topic),
    /// After a skip: hardest problem that is still easier than the skipped one.
    EasierStep,
    /// Uniform pick over everything except the current problem.
    Fallback,
    /// The catalog holds a single problem, so it is shown again.
    OnlyProblem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub reason: SelectionReason,
}

//
// ─── NEXT PROBLEM ──────────────────────────────────────────────────────────────
//

/// Choose the catalog index to present after `current_index`.
///
/// - `Solved`: stay in the weakest topic of `history`, picking the problem
///   whose difficulty is closest to the one just solved.
/// - `Skipped`: step down to the hardest strictly easier problem.
/// - otherwise, or when the rule above has no candidate: any other problem.
///
/// Ties are broken uniformly at random through `rng`. The current index is
/// never returned unless it is the only problem in the catalog. An
/// out-of-range `current_index` is treated as "nothing on screen".
pub fn select_next<R: Rng>(
    catalog: &ProblemCatalog,
    current_index: usize,
    last_action: LastAction,
    history: CombinedHistory<'_>,
    rng: &mut R,
) -> Selection {
    let ruled = match last_action {
        LastAction::Solved => after_solve(catalog, current_index, history, rng),
        LastAction::Skipped => after_skip(catalog, current_index, rng),
        LastAction::None => None,
    };

    let selection = ruled.unwrap_or_else(|| fallback(catalog, current_index, rng));
    debug!(
        current_index,
        ?last_action,
        next_index = selection.index,
        reason = ?selection.reason,
        "selected next problem"
    );
    selection
}

#[allow(clippy::float_cmp)]
fn after_solve<R: Rng>(
    catalog: &ProblemCatalog,
    current_index: usize,
    history: CombinedHistory<'_>,
    rng: &mut R,
) -> Option<Selection> {
    let topic = weakest_topic(catalog, history)?;
    let current = catalog.get(current_index)?;

    let distance = |index: usize| -> f64 {
        catalog
            .get(index)
            .map_or(f64::INFINITY, |p| (p.difficulty() - current.difficulty()).abs())
    };

    let candidates: Vec<usize> = catalog
        .iter()
        .enumerate()
        .filter(|(index, problem)| *index != current_index && problem.topic() == &topic)
        .map(|(index, _)| index)
        .collect();

    let closest = candidates
        .iter()
        .map(|&index| distance(index))
        .fold(f64::INFINITY, f64::min);

    let tied: Vec<usize> = candidates
        .into_iter()
        .filter(|&index| distance(index) == closest)
        .collect();

    tied.choose(rng).map(|&index| Selection {
        index,
        reason: SelectionReason::WeakestTopic(topic),
    })
}

#[allow(clippy::float_cmp)]
fn after_skip<R: Rng>(
    catalog: &ProblemCatalog,
    current_index: usize,
    rng: &mut R,
) -> Option<Selection> {
    let skipped = catalog.get(current_index)?.difficulty();

    let easier: Vec<(usize, f64)> = catalog
        .iter()
        .enumerate()
        .filter(|(index, problem)| *index != current_index && problem.difficulty() < skipped)
        .map(|(index, problem)| (index, problem.difficulty()))
        .collect();

    let hardest = easier
        .iter()
        .map(|&(_, difficulty)| difficulty)
        .fold(f64::NEG_INFINITY, f64::max);

    let tied: Vec<usize> = easier
        .into_iter()
        .filter(|&(_, difficulty)| difficulty == hardest)
        .map(|(index, _)| index)
        .collect();

    tied.choose(rng).map(|&index| Selection {
        index,
        reason: SelectionReason::EasierStep,
    })
}

fn fallback<R: Rng>(catalog: &ProblemCatalog, current_index: usize, rng: &mut R) -> Selection {
    let others: Vec<usize> = (0..catalog.len())
        .filter(|&index| index != current_index)
        .collect();

    match others.choose(rng) {
        Some(&index) => Selection {
            index,
            reason: SelectionReason::Fallback,
        },
        None => Selection {
            index: current_index,
            reason: SelectionReason::OnlyProblem,
        },
    }
}

//
// ─── SESSION START / COMPETITION BATCH ─────────────────────────────────────────
//

/// Uniform pick over the whole catalog, used for the first problem of a session.
pub fn initial_index<R: Rng>(catalog: &ProblemCatalog, rng: &mut R) -> usize {
    rng.random_range(0..catalog.len().max(1))
}

/// Draw `count` distinct catalog indices without replacement.
///
/// Returns fewer than `count` indices when the catalog is smaller.
pub fn sample_batch<R: Rng>(catalog: &ProblemCatalog, count: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..catalog.len()).collect();
    indices.as_mut_slice().shuffle(rng);
    indices.truncate(count);
    indices
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DifficultyRating, Problem, ProblemId, SolvedProblem};
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    const TRIALS: usize = 1000;

    fn build_problem(id: u64, topic: &str, difficulty: f64) -> Problem {
        Problem::new(ProblemId::new(id), "statement", topic, Vec::new(), difficulty).unwrap()
    }

    fn build_catalog(specs: &[(u64, &str, f64)]) -> ProblemCatalog {
        ProblemCatalog::new(
            specs
                .iter()
                .map(|&(id, topic, difficulty)| build_problem(id, topic, difficulty))
                .collect(),
        )
        .unwrap()
    }

    fn three_problem_catalog() -> ProblemCatalog {
        build_catalog(&[(1, "A", 2.0), (2, "A", 8.0), (3, "B", 5.0)])
    }

    fn solved(id: u64) -> SolvedProblem {
        SolvedProblem::new(
            ProblemId::new(id),
            60,
            DifficultyRating::new(5).unwrap(),
            fixed_now(),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn never_repeats_current_with_alternatives() {
        let catalog = build_catalog(&[
            (1, "A", 2.0),
            (2, "A", 8.0),
            (3, "B", 5.0),
            (4, "B", 5.0),
            (5, "C", 1.0),
        ]);
        let global = vec![solved(1), solved(3)];
        let mut rng = rng();

        for trial in 0..TRIALS {
            let current = trial % catalog.len();
            let action = match trial % 3 {
                0 => LastAction::None,
                1 => LastAction::Solved,
                _ => LastAction::Skipped,
            };
            let history = CombinedHistory::new(&global, &[]);
            let next = select_next(&catalog, current, action, history, &mut rng);
            assert_ne!(next.index, current, "trial {trial} with {action:?}");
        }
    }

    #[test]
    fn single_problem_catalog_returns_same_index() {
        let catalog = build_catalog(&[(1, "A", 3.0)]);
        let mut rng = rng();
        for action in [LastAction::None, LastAction::Solved, LastAction::Skipped] {
            let global = vec![solved(1)];
            let next = select_next(
                &catalog,
                0,
                action,
                CombinedHistory::new(&global, &[]),
                &mut rng,
            );
            assert_eq!(next.index, 0);
            assert_eq!(next.reason, SelectionReason::OnlyProblem);
        }
    }

    #[test]
    fn solve_stays_in_weakest_topic() {
        let catalog = build_catalog(&[
            (1, "Geometry", 8.0),
            (2, "Algebra", 2.0),
            (3, "Algebra", 3.0),
            (4, "Algebra", 9.0),
            (5, "Geometry", 7.0),
        ]);
        let global = vec![solved(1), solved(5)];
        let session = vec![solved(2)];
        let mut rng = rng();

        for _ in 0..TRIALS {
            let next = select_next(
                &catalog,
                0,
                LastAction::Solved,
                CombinedHistory::new(&global, &session),
                &mut rng,
            );
            let problem = catalog.get(next.index).unwrap();
            assert_eq!(problem.topic().as_str(), "Algebra");
            // Current difficulty 8.0: Algebra 9.0 is the closest.
            assert_eq!(problem.id(), ProblemId::new(4));
        }
    }

    #[test]
    fn solve_breaks_distance_ties_between_both_sides() {
        let catalog = build_catalog(&[
            (1, "A", 5.0),
            (2, "A", 4.0),
            (3, "A", 6.0),
            (4, "A", 9.0),
        ]);
        let global = vec![solved(1)];
        let mut rng = rng();
        let mut seen = HashSet::new();

        for _ in 0..TRIALS {
            let next = select_next(
                &catalog,
                0,
                LastAction::Solved,
                CombinedHistory::new(&global, &[]),
                &mut rng,
            );
            assert!(matches!(next.reason, SelectionReason::WeakestTopic(_)));
            seen.insert(next.index);
        }
        assert_eq!(seen, HashSet::from([1, 2]));
    }

    #[test]
    fn solve_without_other_problem_in_topic_falls_back() {
        let catalog = three_problem_catalog();
        let global = vec![solved(3)];
        let mut rng = rng();

        // Weakest topic is B, but id 3 is the current problem.
        let next = select_next(
            &catalog,
            2,
            LastAction::Solved,
            CombinedHistory::new(&global, &[]),
            &mut rng,
        );
        assert_eq!(next.reason, SelectionReason::Fallback);
        assert!(next.index == 0 || next.index == 1);
    }

    #[test]
    fn solve_with_empty_history_falls_back() {
        let catalog = three_problem_catalog();
        let mut rng = rng();
        let next = select_next(
            &catalog,
            1,
            LastAction::Solved,
            CombinedHistory::new(&[], &[]),
            &mut rng,
        );
        assert_eq!(next.reason, SelectionReason::Fallback);
        assert_ne!(next.index, 1);
    }

    #[test]
    fn skip_of_easiest_problem_falls_back_to_others() {
        let catalog = three_problem_catalog();
        let mut rng = rng();
        let mut seen = HashSet::new();

        for _ in 0..TRIALS {
            let next = select_next(
                &catalog,
                0,
                LastAction::Skipped,
                CombinedHistory::new(&[], &[]),
                &mut rng,
            );
            assert_eq!(next.reason, SelectionReason::Fallback);
            seen.insert(next.index);
        }
        assert_eq!(seen, HashSet::from([1, 2]));
    }

    #[test]
    fn skip_steps_down_to_hardest_easier_problem() {
        let catalog = three_problem_catalog();
        let mut rng = rng();

        for _ in 0..TRIALS {
            let next = select_next(
                &catalog,
                1,
                LastAction::Skipped,
                CombinedHistory::new(&[], &[]),
                &mut rng,
            );
            assert_eq!(next.reason, SelectionReason::EasierStep);
            assert_eq!(catalog.get(next.index).unwrap().id(), ProblemId::new(3));
        }
    }

    #[test]
    fn skip_result_is_max_of_strictly_easier() {
        let catalog = build_catalog(&[
            (1, "A", 6.0),
            (2, "B", 6.0),
            (3, "C", 4.5),
            (4, "A", 4.5),
            (5, "B", 1.0),
            (6, "C", 9.0),
        ]);
        let mut rng = rng();
        let mut seen = HashSet::new();

        for _ in 0..TRIALS {
            let next = select_next(
                &catalog,
                0,
                LastAction::Skipped,
                CombinedHistory::new(&[], &[]),
                &mut rng,
            );
            let difficulty = catalog.get(next.index).unwrap().difficulty();
            assert!(difficulty < 6.0);
            assert_eq!(difficulty, 4.5);
            seen.insert(next.index);
        }
        assert_eq!(seen, HashSet::from([2, 3]));
    }

    #[test]
    fn no_action_picks_uniformly_among_others() {
        let catalog = three_problem_catalog();
        let mut rng = rng();
        let mut seen = HashSet::new();
        for _ in 0..TRIALS {
            let next = select_next(
                &catalog,
                2,
                LastAction::None,
                CombinedHistory::new(&[], &[]),
                &mut rng,
            );
            seen.insert(next.index);
        }
        assert_eq!(seen, HashSet::from([0, 1]));
    }

    #[test]
    fn out_of_range_current_falls_back_over_whole_catalog() {
        let catalog = three_problem_catalog();
        let mut rng = rng();
        let next = select_next(
            &catalog,
            17,
            LastAction::Skipped,
            CombinedHistory::new(&[], &[]),
            &mut rng,
        );
        assert_eq!(next.reason, SelectionReason::Fallback);
        assert!(next.index < catalog.len());
    }

    #[test]
    fn same_seed_gives_same_choices() {
        let catalog = three_problem_catalog();
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|i| {
                    select_next(
                        &catalog,
                        i % 3,
                        LastAction::None,
                        CombinedHistory::new(&[], &[]),
                        &mut rng,
                    )
                    .index
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn initial_index_is_in_range() {
        let catalog = three_problem_catalog();
        let mut rng = rng();
        for _ in 0..TRIALS {
            assert!(initial_index(&catalog, &mut rng) < catalog.len());
        }
    }

    #[test]
    fn batch_of_three_from_eleven_is_distinct() {
        let specs: Vec<(u64, &str, f64)> = (1..=11).map(|id| (id, "A", 5.0)).collect();
        let catalog = build_catalog(&specs);
        let mut rng = rng();

        for _ in 0..TRIALS {
            let batch = sample_batch(&catalog, 3, &mut rng);
            assert_eq!(batch.len(), 3);
            let ids: HashSet<ProblemId> = batch
                .iter()
                .map(|&i| catalog.get(i).unwrap().id())
                .collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn batch_is_capped_by_catalog_size() {
        let catalog = three_problem_catalog();
        let mut rng = rng();
        let mut batch = sample_batch(&catalog, 10, &mut rng);
        batch.sort_unstable();
        assert_eq!(batch, vec![0, 1, 2]);
    }
}
