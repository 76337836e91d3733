#[allow(clippy::module_inception)]
pub mod error;
pub mod checkpoint;
pub mod executor;
pub mod suite;

pub use checkpoint::CheckpointError;
pub use error::CliError;
pub use executor::{FailureStage, InstanceError, RunError};
pub use suite::SuiteError;
