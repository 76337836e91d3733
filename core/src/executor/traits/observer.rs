use crate::episode::EpisodeRecord;
use crate::executor::types::{RunCounts, RunTally};
use crate::report::AggregateStats;
use crate::task::InstanceIdentity;

/// Receives engine progress. Observers control presentation only; they
/// cannot influence the run.
pub trait SuiteObserver: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn on_event(&self, event: &SuiteEvent);
}

#[derive(Debug, Clone)]
pub enum SuiteEvent {
    RunStart {
        run_id: String,
        total_templates: usize,
        total_instances: usize,
        prior_records: usize,
        /// Identities already completed in the checkpoint.
        completed_instances: usize,
        /// Identities with a prior failure.
        failed_instances: usize,
    },
    TemplateStart {
        run_id: String,
        template: String,
        instances: usize,
    },
    InstanceSkipped {
        run_id: String,
        identity: InstanceIdentity,
        prior_records: usize,
    },
    InstanceStart {
        run_id: String,
        identity: InstanceIdentity,
        goal: String,
    },
    InstanceComplete {
        run_id: String,
        identity: InstanceIdentity,
        record: EpisodeRecord,
        tally: RunTally,
    },
    Summary {
        run_id: String,
        stats: AggregateStats,
    },
    RunEnd {
        run_id: String,
        counts: RunCounts,
    },
}
