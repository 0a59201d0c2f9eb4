// Snapshot persistence: the whole store as one JSON document.
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use dnamatch_core::{Error, Result};
use dnamatch_matching::{CuratedDrop, MatchRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::records::{CandidateRecord, OrganizationRecord, RoleRecord};

pub const SNAPSHOT_FILENAME: &str = "dnamatch.json";
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub candidates: BTreeMap<String, CandidateRecord>,
    #[serde(default)]
    pub organizations: BTreeMap<String, OrganizationRecord>,
    #[serde(default)]
    pub roles: BTreeMap<String, RoleRecord>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub drops: Vec<CuratedDrop>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotData {
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    state: StoreState,
}

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// `None` when no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<StoreState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&self.path)?;
        let snapshot: SnapshotData = serde_json::from_slice(&data)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::Storage(format!(
                "unsupported snapshot version {} in {}",
                snapshot.version,
                self.path.display()
            )));
        }
        Ok(Some(snapshot.state))
    }

    /// Write through a temporary file and rename, so readers never see a
    /// half-written snapshot.
    pub fn save(&self, state: &StoreState) -> Result<()> {
        let snapshot = SnapshotData {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        };
        let data = serde_json::to_vec_pretty(&snapshot)?;

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
            })
    }
}
