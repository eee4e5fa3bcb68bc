//! User-global store: server profiles and project history
//!
//! Modeled as an explicit repository so the interactive flow can be tested
//! against an in-memory implementation. The JSON store reads and rewrites
//! the whole file; there is no locking, matching the single-session usage
//! model of this tool.

use crate::config::model::ServerProfile;
use crate::detect::Archetype;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access configuration store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to access project cache: {0}")]
    Fs(#[from] anyhow::Error),

    #[error("configuration store is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("no cached configuration found at {0}; run `shipwright init` first")]
    MissingCache(PathBuf),
}

/// One line of deployment history per project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub archetype: Option<Archetype>,
    pub last_deploy: DateTime<Utc>,
}

/// Registry of server profiles plus a log of past projects
///
/// Append/overwrite only; nothing is ever deleted through this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerProfile>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectRecord>,
}

/// Read/modify/write access to the user-global configuration
pub trait GlobalStore {
    fn load(&self) -> Result<GlobalConfig, StoreError>;
    fn save(&self, config: &GlobalConfig) -> Result<(), StoreError>;

    /// Overwrite the profile stored under `label`
    fn save_profile(&self, label: &str, profile: &ServerProfile) -> Result<(), StoreError> {
        let mut global = self.load()?;
        global.servers.insert(label.to_string(), profile.clone());
        self.save(&global)
    }

    /// Record a deployment of `name` at the current time
    fn record_project(&self, name: &str, archetype: Option<Archetype>) -> Result<(), StoreError> {
        let mut global = self.load()?;
        global.projects.insert(
            name.to_string(),
            ProjectRecord {
                archetype,
                last_deploy: Utc::now(),
            },
        );
        self.save(&global)
    }
}

/// JSON file store under the user's home directory
pub struct JsonGlobalStore {
    path: PathBuf,
}

impl JsonGlobalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the fixed per-user location, `~/.shipwright/config.json`
    pub fn default_location() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self::new(home.join(".shipwright").join("config.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl GlobalStore for JsonGlobalStore {
    fn load(&self) -> Result<GlobalConfig, StoreError> {
        if !self.path.exists() {
            return Ok(GlobalConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, config: &GlobalConfig) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct InMemoryGlobalStore {
    inner: RwLock<GlobalConfig>,
}

impl InMemoryGlobalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GlobalConfig) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }
}

impl GlobalStore for InMemoryGlobalStore {
    fn load(&self) -> Result<GlobalConfig, StoreError> {
        Ok(self.inner.read().unwrap().clone())
    }

    fn save(&self, config: &GlobalConfig) -> Result<(), StoreError> {
        *self.inner.write().unwrap() = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_profile() -> ServerProfile {
        ServerProfile {
            host: "203.0.113.10".to_string(),
            user: "deploy".to_string(),
            key_path: PathBuf::from("/home/me/.ssh/id_rsa"),
            deploy_dir: "/opt/apps".to_string(),
        }
    }

    #[test]
    fn test_missing_file_loads_default() {
        let temp = TempDir::new().unwrap();
        let store = JsonGlobalStore::new(temp.path().join("config.json"));

        let global = store.load().unwrap();
        assert!(global.servers.is_empty());
        assert!(global.projects.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let store = JsonGlobalStore::new(temp.path().join("nested/dir/config.json"));

        store.save_profile("hetzner", &sample_profile()).unwrap();

        let global = store.load().unwrap();
        assert_eq!(global.servers.len(), 1);
        assert_eq!(global.servers["hetzner"].user, "deploy");
    }

    #[test]
    fn test_profile_label_reuse_overwrites() {
        let store = InMemoryGlobalStore::new();
        store.save_profile("prod", &sample_profile()).unwrap();

        let mut changed = sample_profile();
        changed.host = "203.0.113.99".to_string();
        store.save_profile("prod", &changed).unwrap();

        let global = store.load().unwrap();
        assert_eq!(global.servers.len(), 1);
        assert_eq!(global.servers["prod"].host, "203.0.113.99");
    }

    #[test]
    fn test_record_project() {
        let store = InMemoryGlobalStore::new();
        store
            .record_project("my-app", Some(Archetype::Nextjs))
            .unwrap();

        let global = store.load().unwrap();
        assert_eq!(global.projects["my-app"].archetype, Some(Archetype::Nextjs));
    }

    #[test]
    fn test_corrupt_store_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{broken").unwrap();

        let store = JsonGlobalStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Parse(_))));
    }
}
