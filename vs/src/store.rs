//! Core VersionStore implementation

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Subdirectory of the workspace root that holds version snapshots
pub const HISTORY_DIR: &str = ".layr/history";

/// Default number of versions retained before eviction kicks in
pub const DEFAULT_MAX_VERSIONS: usize = 50;

/// Metadata attached to a saved version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Model that generated the plan, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Prompt the plan was generated from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Human-readable description of why this version was saved
    pub description: String,

    /// Optional user-assigned label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_label: Option<String>,
}

impl VersionMetadata {
    /// Create metadata with just a description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: None,
            description: description.into(),
            version_label: None,
        }
    }
}

/// An immutable snapshot of a plan, generic over the plan payload
///
/// The store never interprets the payload; callers own the typed view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version<P> {
    /// Collision-resistant unique id (UUIDv7)
    pub id: String,

    /// Creation timestamp (Unix milliseconds)
    pub timestamp: i64,

    /// Full plan snapshot, owned by this version
    pub plan: P,

    /// Save metadata
    pub metadata: VersionMetadata,
}

/// File-backed version store
///
/// One pretty-printed JSON document per version under
/// `<workspace>/.layr/history/`, named `<id>.json`. All operations are
/// best-effort: a missing workspace or an I/O failure degrades to
/// `None`/`false`/empty rather than an error, so history never blocks
/// the primary plan-generation flow.
pub struct VersionStore {
    history_dir: Option<PathBuf>,
    max_versions: usize,
}

impl VersionStore {
    /// Open a store rooted at the given workspace directory
    ///
    /// Passing `None` yields a store with no durable location: saves
    /// return `None` and listings are empty.
    pub fn open(workspace_root: Option<&Path>, max_versions: usize) -> Self {
        let history_dir = workspace_root.map(|root| root.join(HISTORY_DIR));
        debug!(?history_dir, max_versions, "Opened version store");
        Self {
            history_dir,
            max_versions,
        }
    }

    /// The history directory, if a durable location is available
    pub fn history_dir(&self) -> Option<&Path> {
        self.history_dir.as_deref()
    }

    fn ensure_history_dir(&self) -> Option<&Path> {
        let dir = self.history_dir.as_deref()?;
        if let Err(e) = fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "Failed to create history directory");
            return None;
        }
        Some(dir)
    }

    fn version_file(&self, id: &str) -> Option<PathBuf> {
        // Ids are UUIDs; anything path-like is rejected outright
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        Some(self.history_dir.as_deref()?.join(format!("{}.json", id)))
    }

    /// Save an immutable snapshot of a plan, returning its id
    ///
    /// Returns `None` when no durable location is available or the write
    /// fails. Saving triggers retention eviction down to the configured
    /// maximum version count.
    pub fn save_version<P: Serialize>(&self, plan: &P, metadata: VersionMetadata) -> Option<String> {
        let dir = self.ensure_history_dir()?;

        // Random-token ids: wall-clock-only ids collide under rapid saves
        let id = Uuid::now_v7().to_string();
        let version = Version {
            id: id.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            plan,
            metadata,
        };

        let json = match serde_json::to_string_pretty(&version) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize version snapshot");
                return None;
            }
        };

        let file = dir.join(format!("{}.json", id));
        if let Err(e) = fs::write(&file, json) {
            warn!(file = %file.display(), error = %e, "Failed to write version snapshot");
            return None;
        }

        info!(%id, "Saved plan version");
        self.cleanup_old_versions(self.max_versions);
        Some(id)
    }

    /// List all versions, newest first
    ///
    /// Individually corrupt entries are logged and skipped; they never
    /// abort the whole listing.
    pub fn get_versions<P: DeserializeOwned>(&self) -> Vec<Version<P>> {
        let Some(dir) = self.history_dir.as_deref() else {
            return Vec::new();
        };
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut versions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to read version file");
                    continue;
                }
            };
            match serde_json::from_str::<Version<P>>(&content) {
                Ok(version) => versions.push(version),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping corrupt version file");
                }
            }
        }

        // Newest first; v7 ids are time-ordered and break same-millisecond ties
        versions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        versions
    }

    /// Fetch one version by id
    pub fn get_version<P: DeserializeOwned>(&self, id: &str) -> Option<Version<P>> {
        let file = self.version_file(id)?;
        let content = fs::read_to_string(&file).ok()?;
        match serde_json::from_str(&content) {
            Ok(version) => Some(version),
            Err(e) => {
                warn!(%id, error = %e, "Failed to parse version file");
                None
            }
        }
    }

    /// Delete one version by id
    pub fn delete_version(&self, id: &str) -> bool {
        let Some(file) = self.version_file(id) else {
            return false;
        };
        if !file.exists() {
            return false;
        }
        match fs::remove_file(&file) {
            Ok(()) => {
                info!(%id, "Deleted plan version");
                true
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to delete version");
                false
            }
        }
    }

    /// Delete the oldest versions beyond `keep`, returning how many were removed
    ///
    /// No-op when the current count is within the cap.
    pub fn cleanup_old_versions(&self, keep: usize) -> usize {
        let versions = self.get_versions::<serde_json::Value>();
        if versions.len() <= keep {
            return 0;
        }

        let mut deleted = 0;
        // Listing is newest-first, so the tail holds the oldest entries
        for version in &versions[keep..] {
            if self.delete_version(&version.id) {
                deleted += 1;
            }
        }
        if deleted > 0 {
            info!(deleted, keep, "Evicted old plan versions");
        }
        deleted
    }
}
