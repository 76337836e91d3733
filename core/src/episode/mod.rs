//! One agent episode against one task instance: the agent/environment
//! boundary traits, the step-budget contract and the record an episode
//! produces.

pub mod record;
pub mod runner;
pub mod trace;
pub mod traits;
pub mod types;

pub use record::EpisodeRecord;
pub use runner::{allocate_step_budget, run_episode, STEPS_PER_COMPLEXITY};
pub use trace::{transpose_columns_to_rows, transpose_rows_to_columns, StepTrace, STEP_NUMBER};
pub use traits::{Agent, Environment};
pub use types::{AgentStep, EpisodeOutcome, EpisodeResult, RunContext, StepData};
