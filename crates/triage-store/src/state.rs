//! Durable encode/decode of the triage session state.
//!
//! The on-disk format is a single JSON document: the waiting records
//! (arbitrary order; the queue re-derives ordering on load) followed by the
//! two counters. Saves go through a temp-file-then-rename so a crash mid-write
//! can never leave a half-written file where the next load would see it.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use triage_core::AdmissionRecord;

use crate::error::StoreError;

/// The full persisted tuple: waiting set plus both counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub waiting: Vec<AdmissionRecord>,
    pub next_arrival: u64,
    pub treated: u64,
}

/// Result of attempting to load prior state. Absence and corruption are
/// ordinary outcomes the session falls back from, not errors that propagate.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(PersistedState),
    /// No prior file: first run.
    Absent,
    /// A file exists but does not parse; the detail is for the operator log.
    Corrupt(String),
}

/// Handle to the single state file. Touched only at session start and
/// shutdown, never on the admit/treat path.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode prior state from disk.
    pub fn load(&self) -> LoadOutcome {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Absent,
            Err(e) => return LoadOutcome::Corrupt(format!("read {}: {e}", self.path.display())),
        };
        match serde_json::from_slice::<PersistedState>(&raw) {
            Ok(state) => {
                info!(
                    path = %self.path.display(),
                    waiting = state.waiting.len(),
                    treated = state.treated,
                    "state loaded"
                );
                LoadOutcome::Loaded(state)
            }
            Err(e) => LoadOutcome::Corrupt(format!("parse {}: {e}", self.path.display())),
        }
    }

    /// Encode the given state as one atomic unit: write a sibling temp file,
    /// fsync it, then rename over the target.
    pub fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Io(format!("create dir: {e}")))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let encoded = serde_json::to_vec_pretty(state)?;
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&encoded)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            waiting = state.waiting.len(),
            treated = state.treated,
            "state saved"
        );
        Ok(())
    }
}
