use std::sync::{Mutex, MutexGuard};

use crate::episode::EpisodeRecord;
use crate::error::CheckpointError;
use crate::task::InstanceIdentity;

use super::traits::{project, CheckpointStore};

/// In-process store, for tests and for embedding the engine where the caller
/// persists results itself.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    records: Mutex<Vec<EpisodeRecord>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<EpisodeRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Snapshot of everything saved so far, unprojected.
    pub fn records(&self) -> Result<Vec<EpisodeRecord>, CheckpointError> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<EpisodeRecord>>, CheckpointError> {
        self.records
            .lock()
            .map_err(|_| CheckpointError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, fields: &[&str]) -> Result<Vec<EpisodeRecord>, CheckpointError> {
        self.lock()?.iter().map(|r| project(r, fields)).collect()
    }

    fn save_episodes(
        &self,
        records: &[EpisodeRecord],
        identity: &InstanceIdentity,
    ) -> Result<(), CheckpointError> {
        tracing::debug!(instance = %identity, count = records.len(), "saving episodes to memory store");
        self.lock()?.extend_from_slice(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(template: &str, index: usize) -> EpisodeRecord {
        serde_json::from_value(json!({
            "goal": "g",
            "task_template": template,
            "instance_id": index,
            "is_successful": 1.0,
            "episode_data": { "step_number": [1] },
            "episode_length": 1,
            "run_time": 0.5,
        }))
        .unwrap()
    }

    #[test]
    fn load_projects_fields_but_keeps_identity() {
        let store = MemoryCheckpointStore::new();
        store
            .save_episodes(&[record("Foo", 0)], &InstanceIdentity::new("Foo", 0))
            .unwrap();

        let loaded = store.load(&["is_successful"]).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].identity(), InstanceIdentity::new("Foo", 0));
        assert_eq!(loaded[0].is_successful, Some(1.0));
        assert_eq!(loaded[0].episode_data, None);
        assert_eq!(loaded[0].run_time, 0.0);

        let full = store.load(&[]).unwrap();
        assert!(full[0].episode_data.is_some());
    }
}
