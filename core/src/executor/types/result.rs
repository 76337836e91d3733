use crate::episode::EpisodeRecord;

/// Running success tally. Records with a failure description never count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunTally {
    /// Sum of success signals.
    pub correct: f64,
    pub total: usize,
}

impl RunTally {
    pub fn record(&mut self, record: &EpisodeRecord) {
        if record.is_failure() {
            return;
        }
        self.correct += record.is_successful.unwrap_or(0.0);
        self.total += 1;
    }

    pub fn success_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct / self.total as f64)
    }
}

/// Counters for one engine run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunCounts {
    /// Instances in the suite.
    pub total_instances: usize,

    /// Instances actually attempted in this run.
    pub executed: usize,

    /// Instances skipped because a completed record already existed.
    pub skipped: usize,

    /// Attempts in this run that ended in a failure record.
    pub failed: usize,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    pub tally: RunTally,
}
