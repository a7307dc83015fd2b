//! Server-side configuration.
//!
//! Loaded from `/etc/mdp/<name>.toml` or an explicit path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use mdp_core::ServiceConfig;

/// Which sheet store backs the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Persistent redb file under `data_dir`.
    #[default]
    Redb,
    /// Process memory; contents are lost on restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,

    #[serde(default)]
    pub backend: Backend,

    /// Overrides `{data_dir}/sheets.redb`.
    #[serde(default)]
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    /// Table name → ordered columns, merged over the built-in tables.
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<String>>,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A value containing `/` or `.` is used as-is; otherwise it names
    /// `/etc/mdp/<name>.toml`.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/mdp/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Storage paths and listener for store initialization.
    pub fn service_config(&self, listen: &str) -> ServiceConfig {
        ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            db_path: self.storage.db_path.as_ref().map(PathBuf::from),
            listen: listen.to_string(),
        }
    }
}
