//! Topic-weakness analysis over solve history.
//!
//! Averages use each problem's difficulty *as stored in the catalog now*, not
//! the rating recorded with the solve, so recalibration shifts the picture
//! immediately.

use std::collections::HashMap;
use tracing::warn;

use crate::catalog::ProblemCatalog;
use crate::model::{CombinedHistory, Topic};

/// Running difficulty total for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TopicStat {
    pub total_difficulty: f64,
    pub count: u32,
}

impl TopicStat {
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_difficulty / f64::from(self.count)
        }
    }
}

/// Per-topic aggregates, kept in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopicStats {
    entries: Vec<(Topic, TopicStat)>,
}

impl TopicStats {
    /// Group `history` by topic.
    ///
    /// Records whose problem is missing from the catalog are skipped.
    #[must_use]
    pub fn from_history(catalog: &ProblemCatalog, history: CombinedHistory<'_>) -> Self {
        let mut entries: Vec<(Topic, TopicStat)> = Vec::new();
        let mut slots: HashMap<Topic, usize> = HashMap::new();

        for record in history.iter() {
            let Some(problem) = catalog.by_id(record.problem_id()) else {
                warn!(problem_id = %record.problem_id(), "solve record for unknown problem ignored");
                continue;
            };
            let slot = *slots.entry(problem.topic().clone()).or_insert_with(|| {
                entries.push((problem.topic().clone(), TopicStat::default()));
                entries.len() - 1
            });
            let stat = &mut entries[slot].1;
            stat.total_difficulty += problem.difficulty();
            stat.count += 1;
        }

        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, topic: &Topic) -> Option<&TopicStat> {
        self.entries
            .iter()
            .find(|(t, _)| t == topic)
            .map(|(_, stat)| stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Topic, &TopicStat)> {
        self.entries.iter().map(|(t, s)| (t, s))
    }

    /// Topic with the lowest average difficulty.
    ///
    /// On equal averages the topic seen first wins. `None` when there is no
    /// history to learn from.
    #[must_use]
    pub fn weakest(&self) -> Option<&Topic> {
        let mut best: Option<(&Topic, f64)> = None;
        for (topic, stat) in &self.entries {
            let average = stat.average();
            match best {
                Some((_, best_avg)) if average >= best_avg => {}
                _ => best = Some((topic, average)),
            }
        }
        best.map(|(topic, _)| topic)
    }
}

/// Shorthand for `TopicStats::from_history(..).weakest()`.
#[must_use]
pub fn weakest_topic(catalog: &ProblemCatalog, history: CombinedHistory<'_>) -> Option<Topic> {
    TopicStats::from_history(catalog, history).weakest().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DifficultyRating, Problem, ProblemId, SolvedProblem};
    use crate::time::fixed_now;

    fn build_problem(id: u64, topic: &str, difficulty: f64) -> Problem {
        Problem::new(ProblemId::new(id), "statement", topic, Vec::new(), difficulty).unwrap()
    }

    fn build_catalog() -> ProblemCatalog {
        ProblemCatalog::new(vec![
            build_problem(1, "Geometry", 7.0),
            build_problem(2, "Algebra", 3.0),
            build_problem(3, "Algebra", 5.0),
            build_problem(4, "Combinatorics", 4.0),
            build_problem(5, "Number Theory", 4.0),
        ])
        .unwrap()
    }

    fn solved(id: u64) -> SolvedProblem {
        SolvedProblem::new(
            ProblemId::new(id),
            100,
            DifficultyRating::new(10).unwrap(),
            fixed_now(),
        )
    }

    #[test]
    fn empty_history_has_no_weakest_topic() {
        let catalog = build_catalog();
        assert_eq!(weakest_topic(&catalog, CombinedHistory::new(&[], &[])), None);
    }

    #[test]
    fn single_topic_history_returns_that_topic() {
        let catalog = build_catalog();
        let global = vec![solved(1), solved(1)];
        assert_eq!(
            weakest_topic(&catalog, CombinedHistory::new(&global, &[])),
            Some(Topic::from("Geometry"))
        );
    }

    #[test]
    fn averages_use_catalog_difficulty_not_rating() {
        let catalog = build_catalog();
        let global = vec![solved(2), solved(3), solved(1)];
        let stats = TopicStats::from_history(&catalog, CombinedHistory::new(&global, &[]));

        let algebra = stats.get(&Topic::from("Algebra")).unwrap();
        assert_eq!(algebra.count, 2);
        assert_eq!(algebra.average(), 4.0);
        assert_eq!(stats.weakest(), Some(&Topic::from("Algebra")));
    }

    #[test]
    fn equal_averages_resolve_to_first_seen() {
        let catalog = build_catalog();
        let global = vec![solved(5)];
        let session = vec![solved(4)];
        let stats = TopicStats::from_history(&catalog, CombinedHistory::new(&global, &session));
        assert_eq!(stats.weakest(), Some(&Topic::from("Number Theory")));

        let global = vec![solved(4)];
        let session = vec![solved(5)];
        let stats = TopicStats::from_history(&catalog, CombinedHistory::new(&global, &session));
        assert_eq!(stats.weakest(), Some(&Topic::from("Combinatorics")));
    }

    #[test]
    fn session_records_count_alongside_global() {
        let catalog = build_catalog();
        let global = vec![solved(1)];
        let session = vec![solved(2)];
        let stats = TopicStats::from_history(&catalog, CombinedHistory::new(&global, &session));

        let order: Vec<&str> = stats.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["Geometry", "Algebra"]);
        assert_eq!(stats.weakest(), Some(&Topic::from("Algebra")));
    }

    #[test]
    fn recalibration_changes_the_weakest_topic() {
        let mut catalog = build_catalog();
        let global = vec![solved(2), solved(4)];
        assert_eq!(
            weakest_topic(&catalog, CombinedHistory::new(&global, &[])),
            Some(Topic::from("Algebra"))
        );

        // 3.0 -> 6.5, now above Combinatorics at 4.0.
        catalog
            .recalibrate(ProblemId::new(2), DifficultyRating::new(10).unwrap())
            .unwrap();
        assert_eq!(
            weakest_topic(&catalog, CombinedHistory::new(&global, &[])),
            Some(Topic::from("Combinatorics"))
        );
    }

    #[test]
    fn unknown_problems_are_ignored() {
        let catalog = build_catalog();
        let global = vec![solved(99)];
        let stats = TopicStats::from_history(&catalog, CombinedHistory::new(&global, &[]));
        assert!(stats.is_empty());
        assert_eq!(stats.weakest(), None);
    }
}
