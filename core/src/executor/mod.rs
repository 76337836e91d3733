//! Checkpointed suite execution.
//!
//! ```text
//! Suite
//!   ↓
//! SuiteRunner::run()
//!   ├─ CheckpointStore::load(METADATA_FIELDS) → CheckpointState
//!   ├─ per instance: skip if completed, else attempt (isolated)
//!   │    initialize → run_episode → is_successful → tear_down
//!   ├─ CheckpointStore::save_episodes() after every attempt
//!   └─ SuiteObserver events (or tracing fallback)
//!   ↓
//! Vec<EpisodeRecord>
//! ```

mod engine;
mod output;
mod progress;
pub mod traits;
pub mod types;

pub use engine::{SuiteRunner, SuiteRunnerBuilder};
pub use output::log_event;
pub use progress::ProgressMonitor;
pub use traits::{SuiteEvent, SuiteObserver};
pub use types::{RunCounts, RunTally};
