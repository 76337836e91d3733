use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{InstanceIdentity, TaskInstance};

use super::trace::StepTrace;
use super::types::{EpisodeOutcome, EpisodeResult};

/// Persisted result of one attempt at one instance.
///
/// Field names are part of the checkpoint format. Every field except the
/// identity pair has a serde default so that projected loads, which keep only
/// a subset of fields, still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(default)]
    pub goal: String,
    pub task_template: String,
    pub instance_id: usize,
    #[serde(default)]
    pub is_successful: Option<f64>,
    #[serde(default)]
    pub episode_data: Option<StepTrace>,
    #[serde(default)]
    pub episode_length: Option<usize>,
    /// Wall-clock seconds.
    #[serde(default)]
    pub run_time: f64,
    #[serde(default)]
    pub finish_dtime: DateTime<Utc>,
    #[serde(default)]
    pub exception_info: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub outcome: Option<EpisodeOutcome>,
}

impl EpisodeRecord {
    pub fn completed(
        instance: &TaskInstance,
        index: usize,
        episode: EpisodeResult,
        is_successful: f64,
        run_time: f64,
    ) -> Self {
        Self {
            goal: instance.goal.clone(),
            task_template: instance.template_name.clone(),
            instance_id: index,
            is_successful: Some(is_successful),
            episode_length: Some(episode.steps_taken),
            episode_data: Some(episode.step_data),
            run_time,
            finish_dtime: Utc::now(),
            exception_info: None,
            seed: instance.seed,
            agent_name: None,
            outcome: Some(episode.outcome),
        }
    }

    /// Record for an attempt that raised. Success, length and trace stay
    /// empty so the record never contributes to success tallies.
    pub fn failed(
        instance: &TaskInstance,
        index: usize,
        exception_info: impl Into<String>,
        run_time: f64,
    ) -> Self {
        Self {
            goal: instance.goal.clone(),
            task_template: instance.template_name.clone(),
            instance_id: index,
            is_successful: None,
            episode_data: None,
            episode_length: None,
            run_time,
            finish_dtime: Utc::now(),
            exception_info: Some(exception_info.into()),
            seed: instance.seed,
            agent_name: None,
            outcome: None,
        }
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    pub fn identity(&self) -> InstanceIdentity {
        InstanceIdentity::new(self.task_template.clone(), self.instance_id)
    }

    pub fn is_failure(&self) -> bool {
        self.exception_info.is_some()
    }
}
