use std::fmt;

use thiserror::Error;

use super::{CheckpointError, SuiteError};

/// Where inside an instance attempt a fault happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Prepare,
    Initialize,
    Episode,
    Evaluate,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Prepare => "prepare",
            Self::Initialize => "initialize",
            Self::Episode => "episode",
            Self::Evaluate => "evaluate",
        };
        f.write_str(s)
    }
}

/// A fault inside a single instance attempt. Never escapes the engine loop:
/// it is converted into a failure record and the batch continues.
#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("{stage} failed: {source:?}")]
    Stage {
        stage: FailureStage,
        #[source]
        source: anyhow::Error,
    },

    #[error("panicked: {0}")]
    Panic(String),
}

impl InstanceError {
    pub fn at(stage: FailureStage) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Stage { stage, source }
    }
}

/// Errors that stop a suite run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Suite(#[from] SuiteError),

    #[error("{0}")]
    Checkpoint(#[from] CheckpointError),
}
