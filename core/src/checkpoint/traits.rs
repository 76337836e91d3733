use serde_json::Value;

use crate::episode::EpisodeRecord;
use crate::error::CheckpointError;
use crate::task::InstanceIdentity;

/// Fields the engine needs to resume and aggregate; everything but the step
/// trace.
pub const METADATA_FIELDS: &[&str] = &[
    "goal",
    "task_template",
    "instance_id",
    "is_successful",
    "episode_length",
    "run_time",
    "finish_dtime",
    "exception_info",
    "seed",
    "agent_name",
    "outcome",
];

/// Always kept by a projection; a record cannot be keyed without them.
pub const IDENTITY_FIELDS: &[&str] = &["task_template", "instance_id"];

pub trait CheckpointStore: Send + Sync {
    fn name(&self) -> &str;

    /// Every stored record, keeping only `fields` (empty keeps everything).
    fn load(&self, fields: &[&str]) -> Result<Vec<EpisodeRecord>, CheckpointError>;

    /// Append `records` under `identity`. Must be durable before returning.
    fn save_episodes(
        &self,
        records: &[EpisodeRecord],
        identity: &InstanceIdentity,
    ) -> Result<(), CheckpointError>;
}

/// Drop every key of a serialized record not named in `fields`.
pub fn project_value(value: &mut Value, fields: &[&str]) {
    if fields.is_empty() {
        return;
    }
    if let Value::Object(map) = value {
        map.retain(|key, _| {
            fields.contains(&key.as_str()) || IDENTITY_FIELDS.contains(&key.as_str())
        });
    }
}

pub fn project(record: &EpisodeRecord, fields: &[&str]) -> Result<EpisodeRecord, CheckpointError> {
    if fields.is_empty() {
        return Ok(record.clone());
    }
    let mut value = serde_json::to_value(record)?;
    project_value(&mut value, fields);
    Ok(serde_json::from_value(value)?)
}
