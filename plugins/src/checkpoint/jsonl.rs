//! Append-only JSONL checkpoint directory.
//!
//! One file per instance identity, `<dir>/<template>_<index>.jsonl`, one
//! serialized [`EpisodeRecord`] per line. Saves append and `fsync` before
//! returning, so a crash can at worst leave a partial trailing line. `load`
//! skips it and the next save to that file cuts it off before appending.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use suitekit_core::api::{CheckpointError, CheckpointStore, EpisodeRecord, InstanceIdentity};
use suitekit_core::checkpoint::project_value;

const EXTENSION: &str = "jsonl";

pub struct JsonlCheckpointStore {
    directory: PathBuf,
}

impl JsonlCheckpointStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_for(&self, identity: &InstanceIdentity) -> PathBuf {
        self.directory.join(format!("{identity}.{EXTENSION}"))
    }

    fn checkpoint_files(&self) -> Result<Vec<PathBuf>, CheckpointError> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CheckpointError::io(&self.directory, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CheckpointError::io(&self.directory, e))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_file(
        &self,
        path: &Path,
        fields: &[&str],
        out: &mut Vec<EpisodeRecord>,
    ) -> Result<(), CheckpointError> {
        let content = fs::read_to_string(path).map_err(|e| CheckpointError::io(path, e))?;
        let terminated = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().collect();

        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = serde_json::from_str::<Value>(line).and_then(|mut value| {
                project_value(&mut value, fields);
                serde_json::from_value::<EpisodeRecord>(value)
            });
            match parsed {
                Ok(record) => out.push(record),
                Err(e) if idx + 1 == lines.len() && !terminated => {
                    tracing::warn!(
                        path = %path.display(),
                        line = idx + 1,
                        error = %e,
                        "skipping torn trailing checkpoint line"
                    );
                }
                Err(source) => {
                    return Err(CheckpointError::Corrupt {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

impl CheckpointStore for JsonlCheckpointStore {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn load(&self, fields: &[&str]) -> Result<Vec<EpisodeRecord>, CheckpointError> {
        let mut records = Vec::new();
        for path in self.checkpoint_files()? {
            self.read_file(&path, fields, &mut records)?;
        }
        tracing::debug!(
            directory = %self.directory.display(),
            records = records.len(),
            "loaded checkpoint"
        );
        Ok(records)
    }

    fn save_episodes(
        &self,
        records: &[EpisodeRecord],
        identity: &InstanceIdentity,
    ) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| CheckpointError::io(&self.directory, e))?;

        let path = self.file_for(identity);
        let mut buf = String::new();
        for record in records {
            buf.push_str(&serde_json::to_string(record)?);
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| CheckpointError::io(&path, e))?;
        drop_torn_tail(&mut file, &path).map_err(|e| CheckpointError::io(&path, e))?;
        file.write_all(buf.as_bytes())
            .map_err(|e| CheckpointError::io(&path, e))?;
        file.sync_all().map_err(|e| CheckpointError::io(&path, e))?;
        Ok(())
    }
}

/// Truncate `file` back to its last newline when a previous writer died
/// mid-line.
fn drop_torn_tail(file: &mut File, path: &Path) -> std::io::Result<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(());
    }

    let mut content = Vec::with_capacity(len as usize);
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut content)?;
    let keep = content
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    tracing::warn!(
        path = %path.display(),
        dropped_bytes = content.len() - keep,
        "truncating torn trailing checkpoint line before append"
    );
    file.set_len(keep as u64)?;
    file.sync_all()
}
