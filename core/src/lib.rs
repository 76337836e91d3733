//! Suite construction and checkpointed execution for parameterized agent
//! tasks.
//!
//! Templates are registered in a [`task::TaskRegistry`], expanded into a
//! deterministic [`suite::Suite`] by [`suite::build_suite`], and executed by
//! [`executor::SuiteRunner`], which persists every attempt through a
//! [`checkpoint::CheckpointStore`] so an interrupted batch resumes where it
//! stopped.

pub mod api;
pub mod checkpoint;
pub mod config;
pub mod episode;
pub mod error;
pub mod executor;
pub mod report;
pub mod suite;
pub mod task;
pub mod util;
