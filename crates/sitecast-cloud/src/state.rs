//! Run record persistence.
//!
//! Remembers the outputs of the last successful run in
//! `.sitecast/state.json`, so `sitecast status` can answer without
//! touching the network.

use crate::error::{CloudError, Result};
use crate::host::SiteOutputs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".sitecast";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";

/// Outputs of the last completed provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// State file version.
    pub version: u32,

    /// Domain the run provisioned.
    pub domain: String,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    pub outputs: SiteOutputs,
}

impl RunRecord {
    pub fn new(domain: impl Into<String>, outputs: SiteOutputs) -> Self {
        Self {
            version: STATE_VERSION,
            domain: domain.into(),
            completed_at: Utc::now(),
            outputs,
        }
    }
}

/// Reads and writes the state file under a project root.
pub struct StateManager {
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the last run record, or `None` when no run has completed yet.
    pub async fn load(&self) -> Result<Option<RunRecord>> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let record: RunRecord = serde_json::from_str(&content)?;

        if record.version > STATE_VERSION {
            return Err(CloudError::StateError(format!(
                "state file version {} is newer than supported version {}",
                record.version, STATE_VERSION
            )));
        }

        Ok(Some(record))
    }

    /// Save a run record, rotating the previous file to a backup.
    pub async fn save(&self, record: &RunRecord) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Rotated previous state to backup");
        }

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content).await?;

        tracing::debug!(domain = %record.domain, "Saved run record");
        Ok(())
    }
}
