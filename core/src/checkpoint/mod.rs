//! Durable episode log used to resume interrupted runs.
//!
//! Stores are append-only: a record, once saved, is never rewritten. The
//! engine reads the log once at startup and partitions it into
//! [`CheckpointState`].

pub mod memory;
pub mod null;
pub mod state;
pub mod traits;

pub use memory::MemoryCheckpointStore;
pub use null::NullCheckpointStore;
pub use state::CheckpointState;
pub use traits::{project, project_value, CheckpointStore, IDENTITY_FIELDS, METADATA_FIELDS};
