//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `suitekit_core::api` instead of reaching into internal modules.

pub use crate::checkpoint::{
    CheckpointState, CheckpointStore, MemoryCheckpointStore, NullCheckpointStore,
    METADATA_FIELDS,
};
pub use crate::config::{
    load_default, AppConfig, CheckpointConfig, JsonlCheckpointConfig, LoggingConfig,
    OutputConfig, OutputFormat, RunnerConfig, SuiteConfig,
};
pub use crate::episode::{
    allocate_step_budget, run_episode, Agent, AgentStep, Environment, EpisodeOutcome,
    EpisodeRecord, EpisodeResult, RunContext, StepData, StepTrace,
};
pub use crate::error::{CheckpointError, CliError, InstanceError, RunError, SuiteError};
pub use crate::executor::{SuiteEvent, SuiteObserver, SuiteRunner, RunTally};
pub use crate::report::{aggregate, format_table, to_json, AggregateStats, TemplateStats};
pub use crate::suite::{build_suite, instantiate, Suite, SuiteOptions};
pub use crate::task::{
    FamilyCatalog, InstanceIdentity, Params, TaskInstance, TaskRegistry, TaskTemplate,
    TerminationFn,
};
pub use crate::util::{derive_seed, instance_seed};
