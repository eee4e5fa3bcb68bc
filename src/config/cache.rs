//! Per-project configuration cache
//!
//! One JSON file next to the project, overwritten wholesale on every init.
//! Later standalone commands (`check-dns`, `setup-server`, `setup-secrets`)
//! reload it instead of re-running detection or prompting.

use super::model::CollectedConfig;
use super::store::StoreError;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::debug;

/// File name of the cache, relative to the project root
pub const CACHE_FILE: &str = "shipwright.json";

pub fn save_cached_config<F: FileSystem>(
    fs: &F,
    project_dir: &Path,
    config: &CollectedConfig,
) -> Result<(), StoreError> {
    let path = project_dir.join(CACHE_FILE);
    let content = serde_json::to_string_pretty(config)?;
    fs.write_string(&path, &content)?;
    debug!(path = %path.display(), "wrote project cache");
    Ok(())
}

pub fn load_cached_config<F: FileSystem>(
    fs: &F,
    project_dir: &Path,
) -> Result<CollectedConfig, StoreError> {
    let path = project_dir.join(CACHE_FILE);
    if !fs.is_file(&path) {
        return Err(StoreError::MissingCache(path));
    }
    let content = fs.read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}
