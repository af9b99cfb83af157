use serde::Serialize;
use std::collections::HashMap;

use trainer_core::ProblemCatalog;
use trainer_core::model::{SolvedProblem, Topic};

/// How many solves land in the "recent" list.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: Topic,
    pub solved: u32,
}

/// Average of the users' own ratings for a topic, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRating {
    pub topic: Topic,
    pub average_rating: f64,
}

/// Aggregates behind the progress view.
///
/// Unlike the selector's weakness analysis, which looks at current catalog
/// difficulty, the per-topic averages here are over recorded ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub total_solved: usize,
    pub total_time_secs: u64,
    pub topic_counts: Vec<TopicCount>,
    pub topic_ratings: Vec<TopicRating>,
    pub recent: Vec<SolvedProblem>,
}

impl ProgressReport {
    /// Build the report from a solve log, oldest record first.
    ///
    /// Topics appear in the order they were first solved. Records for
    /// problems missing from `catalog` count toward totals only.
    #[must_use]
    pub fn build(catalog: &ProblemCatalog, records: &[SolvedProblem]) -> Self {
        let mut order: Vec<Topic> = Vec::new();
        let mut sums: HashMap<Topic, (u32, u32)> = HashMap::new();

        for record in records {
            let Some(problem) = catalog.by_id(record.problem_id()) else {
                continue;
            };
            let entry = sums.entry(problem.topic().clone()).or_insert_with(|| {
                order.push(problem.topic().clone());
                (0, 0)
            });
            entry.0 += 1;
            entry.1 += u32::from(record.rating().value());
        }

        let mut topic_counts = Vec::with_capacity(order.len());
        let mut topic_ratings = Vec::with_capacity(order.len());
        for topic in order {
            let (count, rating_total) = sums.get(&topic).copied().unwrap_or_default();
            if count == 0 {
                continue;
            }
            let average = f64::from(rating_total) / f64::from(count);
            topic_ratings.push(TopicRating {
                topic: topic.clone(),
                average_rating: round_2dp(average),
            });
            topic_counts.push(TopicCount {
                topic,
                solved: count,
            });
        }

        Self {
            total_solved: records.len(),
            total_time_secs: records
                .iter()
                .map(|r| u64::from(r.time_spent_secs()))
                .sum(),
            topic_counts,
            topic_ratings,
            recent: records.iter().rev().take(RECENT_LIMIT).cloned().collect(),
        }
    }

    /// Share of solves per topic, as percentages in `topic_counts` order.
    #[must_use]
    pub fn topic_shares(&self) -> Vec<(Topic, f64)> {
        let total: u32 = self.topic_counts.iter().map(|c| c.solved).sum();
        if total == 0 {
            return Vec::new();
        }
        self.topic_counts
            .iter()
            .map(|c| {
                (
                    c.topic.clone(),
                    f64::from(c.solved) * 100.0 / f64::from(total),
                )
            })
            .collect()
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
