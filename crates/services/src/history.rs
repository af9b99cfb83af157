use trainer_core::model::SolvedProblem;

/// Cross-session solve log.
///
/// Append-only: sessions push confirmed solves here and never remove them.
/// Ending a session leaves this log untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveHistory {
    records: Vec<SolvedProblem>,
}

impl SolveHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously collected records, oldest first.
    #[must_use]
    pub fn from_records(records: Vec<SolvedProblem>) -> Self {
        Self { records }
    }

    pub fn record(&mut self, solved: SolvedProblem) {
        self.records.push(solved);
    }

    #[must_use]
    pub fn records(&self) -> &[SolvedProblem] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u64 {
        self.records
            .iter()
            .map(|r| u64::from(r.time_spent_secs()))
            .sum()
    }

    /// The `n` latest solves, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &SolvedProblem> {
        self.records.iter().rev().take(n)
    }
}
