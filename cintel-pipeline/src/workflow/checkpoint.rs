//! Recovery Checkpoint
//!
//! The orchestrator flushes completed enrichments to a JSON checkpoint
//! every few contacts so a restart does not lose finished work. Writes go
//! through a temp file followed by a rename: a crashed or interrupted run
//! can leave a stale temp file behind but never a half-written checkpoint.
//!
//! A checkpoint write failure is fatal to the run - integrity of the
//! master database outranks partial progress.

use crate::types::ContactEnrichment;
use cintel_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    version: u32,
    completed: Vec<ContactEnrichment>,
}

/// JSON recovery checkpoint
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load previously completed enrichments.
    ///
    /// A missing checkpoint is a fresh run; an unreadable or
    /// version-mismatched one is logged and treated as fresh (the pipeline
    /// re-researches rather than trusting damaged state).
    pub fn load(&self) -> Vec<ContactEnrichment> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable checkpoint, starting fresh");
                return Vec::new();
            }
        };

        match serde_json::from_str::<CheckpointFile>(&content) {
            Ok(file) if file.version == CHECKPOINT_VERSION => {
                tracing::info!(
                    path = %self.path.display(),
                    completed = file.completed.len(),
                    "Resuming from checkpoint"
                );
                file.completed
            }
            Ok(file) => {
                tracing::warn!(
                    path = %self.path.display(),
                    version = file.version,
                    "Checkpoint version mismatch, starting fresh"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt checkpoint, starting fresh");
                Vec::new()
            }
        }
    }

    /// Flush the completed set. Fatal on failure.
    pub fn flush(&self, completed: &[ContactEnrichment]) -> Result<()> {
        let file = CheckpointFile {
            version: CHECKPOINT_VERSION,
            completed: completed.to_vec(),
        };
        let json = serde_json::to_string(&file)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Persistence(format!("{}: {}", parent.display(), e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .map_err(|e| Error::Persistence(format!("{}: {}", temp_path.display(), e)))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::Persistence(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!(
            path = %self.path.display(),
            completed = completed.len(),
            "Checkpoint flushed"
        );
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContactIdentity, RawContactRecord};

    fn enrichment(name: &str) -> ContactEnrichment {
        let record = RawContactRecord {
            full_name: name.to_string(),
            organization: "Justice Org".to_string(),
            ..Default::default()
        };
        let identity = ContactIdentity::from_record(&record).unwrap();
        ContactEnrichment::new(identity, record)
    }

    #[test]
    fn test_missing_checkpoint_is_fresh_run() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Checkpoint::new(dir.path().join("checkpoint.json"));
        assert!(checkpoint.load().is_empty());
    }

    #[test]
    fn test_flush_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Checkpoint::new(dir.path().join("checkpoint.json"));

        checkpoint
            .flush(&[enrichment("Jane Doe"), enrichment("Bob Smith")])
            .unwrap();

        let loaded = checkpoint.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].record.full_name, "Jane Doe");
    }

    #[test]
    fn test_corrupt_checkpoint_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        std::fs::write(&path, "{ damaged").unwrap();

        let checkpoint = Checkpoint::new(path);
        assert!(checkpoint.load().is_empty());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Checkpoint::new(dir.path().join("checkpoint.json"));
        checkpoint.flush(&[enrichment("Jane Doe")]).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_unwritable_path_is_fatal() {
        let checkpoint = Checkpoint::new("/proc/definitely/not/writable/checkpoint.json");
        let result = checkpoint.flush(&[enrichment("Jane Doe")]);
        assert!(matches!(result, Err(Error::Persistence(_))));
    }
}
