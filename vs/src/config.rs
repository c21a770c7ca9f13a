//! Configuration for versionstore

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace root that owns the `.layr/history` directory
    #[serde(default = "default_workspace_root", rename = "workspace-root")]
    pub workspace_root: PathBuf,

    /// Maximum number of versions retained before eviction
    #[serde(default = "default_max_versions", rename = "max-versions")]
    pub max_versions: usize,
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_versions() -> usize {
    crate::DEFAULT_MAX_VERSIONS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            max_versions: default_max_versions(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("layr").join("versionstore.yml")),
            Some(PathBuf::from("versionstore.yml")),
        ];

        for candidate in default_paths.into_iter().flatten() {
            if candidate.exists() {
                let content = std::fs::read_to_string(&candidate)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }
}
