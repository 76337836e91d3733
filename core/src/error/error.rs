use thiserror::Error;

use super::{CheckpointError, RunError, SuiteError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Suite(#[from] SuiteError),
    #[error("run failed: {0}")]
    Run(#[from] RunError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// 11: configuration (bad config file, unknown task/family)
    /// 20: checkpoint or filesystem failure
    /// 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Suite(_) => 11,
            Self::Run(RunError::Suite(_)) => 11,
            Self::Run(RunError::Checkpoint(_)) | Self::Checkpoint(_) | Self::Io(_) => 20,
            Self::Command(_) => 20,
            Self::Anyhow(_) => 50,
        }
    }
}
