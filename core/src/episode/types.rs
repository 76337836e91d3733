use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::task::InstanceIdentity;

use super::trace::StepTrace;

/// Free-form per-step data emitted by an agent.
pub type StepData = BTreeMap<String, serde_json::Value>;

/// Why an episode stopped.
///
/// `done` on [`EpisodeResult`] is true for every variant except
/// `NotStarted`; callers that need to tell an explicit completion apart from
/// running out of steps match on this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// Zero step budget; the agent was never reset.
    NotStarted,
    AgentCompleted,
    EnvironmentTerminated,
    BudgetExhausted,
}

impl EpisodeOutcome {
    pub fn is_done(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::AgentCompleted => "agent_completed",
            Self::EnvironmentTerminated => "environment_terminated",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one `Agent::step` call returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStep {
    pub done: bool,
    pub data: StepData,
}

impl AgentStep {
    pub fn running(data: StepData) -> Self {
        Self { done: false, data }
    }

    pub fn finished(data: StepData) -> Self {
        Self { done: true, data }
    }
}

/// Runtime bookkeeping for one attempt, kept apart from the immutable
/// [`crate::task::TaskInstance`].
#[derive(Debug, Clone)]
pub struct RunContext {
    pub identity: InstanceIdentity,
    pub save_dir: Option<PathBuf>,
    pub step_budget: usize,
    pub steps_taken: usize,
}

impl RunContext {
    pub fn new(identity: InstanceIdentity, step_budget: usize) -> Self {
        Self {
            identity,
            save_dir: None,
            step_budget,
            steps_taken: 0,
        }
    }

    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    pub fn remaining_steps(&self) -> usize {
        self.step_budget.saturating_sub(self.steps_taken)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    pub done: bool,
    pub outcome: EpisodeOutcome,
    pub step_data: StepTrace,
    pub steps_taken: usize,
}

impl EpisodeResult {
    pub fn not_started() -> Self {
        Self {
            done: false,
            outcome: EpisodeOutcome::NotStarted,
            step_data: StepTrace::new(),
            steps_taken: 0,
        }
    }

    pub fn finished(outcome: EpisodeOutcome, step_data: StepTrace, steps_taken: usize) -> Self {
        Self {
            done: outcome.is_done(),
            outcome,
            step_data,
            steps_taken,
        }
    }
}
