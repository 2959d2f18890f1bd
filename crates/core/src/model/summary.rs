use chrono::{DateTime, Duration, Utc};

/// Snapshot of a quiz session's score and timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub answered: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizSummary {
    /// Share of correct answers over all questions, rounded down to a whole percent.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.score.saturating_mul(100) / self.total;
        u32::try_from(pct).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.score == self.total
    }

    /// Time from start to completion; `None` while the quiz is unfinished.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.completed_at.map(|done| done - self.started_at)
    }
}
