//! Override document storage.
//!
//! The store holds exactly one JSON document. When a state file is
//! configured, writes go through a temp file plus rename so a crash mid-write
//! never leaves a torn document; without one, the store runs memory-only and
//! reports that mode back to callers.

use std::path::PathBuf;

use chrono::Utc;
use picks_data::OverrideState;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// How a write was persisted, reported in the PUT response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Saved,
    InMemoryOnly,
}

impl SaveMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SaveMode::Saved => "saved",
            SaveMode::InMemoryOnly => "saved_in_memory_only",
        }
    }
}

pub struct StateStore {
    path: Option<PathBuf>,
    state: RwLock<OverrideState>,
}

impl StateStore {
    /// Opens the store, reading any existing state file.
    ///
    /// An unreadable or malformed file degrades to an empty document with a
    /// warning; refusing to start would take writes down along with reads.
    pub async fn open(path: Option<PathBuf>) -> Self {
        let initial = match &path {
            Some(path) => match tokio::fs::read_to_string(path).await {
                Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                    Ok(value) => {
                        let (state, discarded) = OverrideState::from_value_lossy(&value);
                        if !discarded.is_empty() {
                            warn!(file = %path.display(), fields = ?discarded,
                                "discarded malformed override fields from state file");
                        }
                        state
                    }
                    Err(err) => {
                        warn!(file = %path.display(), error = %err,
                            "state file is not valid JSON; starting empty");
                        OverrideState::default()
                    }
                },
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    info!(file = %path.display(), "no state file yet; starting empty");
                    OverrideState::default()
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err,
                        "cannot read state file; starting empty");
                    OverrideState::default()
                }
            },
            None => OverrideState::default(),
        };

        Self {
            path,
            state: RwLock::new(initial),
        }
    }

    /// Whether writes are persisted to disk.
    #[must_use]
    pub fn file_backed(&self) -> bool {
        self.path.is_some()
    }

    /// The current document.
    pub async fn get(&self) -> OverrideState {
        self.state.read().await.clone()
    }

    /// Replaces the document wholesale, stamping `updatedAt`.
    ///
    /// The write lock is held across persistence so concurrent writers
    /// serialize; last write wins. A failed disk write keeps the in-memory
    /// document and downgrades the reported mode.
    pub async fn replace(&self, mut state: OverrideState) -> (OverrideState, SaveMode) {
        state.updated_at = Some(Utc::now());

        let mut guard = self.state.write().await;
        *guard = state.clone();

        let mode = match &self.path {
            Some(path) => match persist(path, &state).await {
                Ok(()) => SaveMode::Saved,
                Err(err) => {
                    warn!(file = %path.display(), error = %err,
                        "failed to persist state file; keeping in-memory state");
                    SaveMode::InMemoryOnly
                }
            },
            None => SaveMode::InMemoryOnly,
        };
        drop(guard);

        (state, mode)
    }
}

/// Atomic write: temp file in the same directory, then rename over the
/// target.
async fn persist(path: &std::path::Path, state: &OverrideState) -> std::io::Result<()> {
    let body = serde_json::to_vec_pretty(state)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &body).await?;
    tokio::fs::rename(&tmp, path).await
}
