//! VersionStore - append-only plan version history
//!
//! Persists immutable snapshots of generated plans to a workspace-scoped
//! directory, with bounded retention via oldest-first eviction.
//!
//! # Architecture
//!
//! ```text
//! <workspace>/.layr/history/
//! ├── 0198f2a4-....json    # one Version document per save
//! ├── 0198f2a5-....json
//! └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use versionstore::{VersionMetadata, VersionStore};
//!
//! let store = VersionStore::open(Some(workspace_root), 50);
//! let id = store.save_version(&plan, VersionMetadata::new("Initial plan"));
//! let versions = store.get_versions::<serde_json::Value>();
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{DEFAULT_MAX_VERSIONS, HISTORY_DIR, Version, VersionMetadata, VersionStore};
