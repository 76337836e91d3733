use crate::episode::EpisodeRecord;
use crate::error::CheckpointError;
use crate::task::InstanceIdentity;

use super::traits::CheckpointStore;

/// Checkpoint-free runs: loads nothing, accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCheckpointStore;

impl CheckpointStore for NullCheckpointStore {
    fn name(&self) -> &str {
        "null"
    }

    fn load(&self, _fields: &[&str]) -> Result<Vec<EpisodeRecord>, CheckpointError> {
        Ok(Vec::new())
    }

    fn save_episodes(
        &self,
        _records: &[EpisodeRecord],
        _identity: &InstanceIdentity,
    ) -> Result<(), CheckpointError> {
        Ok(())
    }
}
