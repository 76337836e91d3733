use std::collections::HashMap;

use crate::episode::EpisodeRecord;
use crate::task::InstanceIdentity;

/// Prior records split by identity into completed and failed attempts, each
/// list in checkpoint order.
#[derive(Debug, Default, Clone)]
pub struct CheckpointState {
    completed: HashMap<InstanceIdentity, Vec<EpisodeRecord>>,
    failed: HashMap<InstanceIdentity, Vec<EpisodeRecord>>,
}

impl CheckpointState {
    pub fn from_records(records: Vec<EpisodeRecord>) -> Self {
        let mut state = Self::default();
        for record in records {
            let bucket = if record.is_failure() {
                &mut state.failed
            } else {
                &mut state.completed
            };
            bucket.entry(record.identity()).or_default().push(record);
        }
        state
    }

    pub fn completed(&self, identity: &InstanceIdentity) -> &[EpisodeRecord] {
        self.completed.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn failed(&self, identity: &InstanceIdentity) -> &[EpisodeRecord] {
        self.failed.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A single completed record is enough; earlier failures do not matter.
    pub fn is_completed(&self, identity: &InstanceIdentity) -> bool {
        !self.completed(identity).is_empty()
    }

    /// All prior records for `identity`: completed first, then failed.
    pub fn prior(&self, identity: &InstanceIdentity) -> impl Iterator<Item = &EpisodeRecord> {
        self.completed(identity)
            .iter()
            .chain(self.failed(identity).iter())
    }

    /// Identities that will be skipped.
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Identities with at least one failed attempt on record.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
