//! Env-file discovery and key extraction

use crate::fs::FileSystem;
use std::path::Path;

/// Candidate env files, highest priority first
const ENV_FILE_CANDIDATES: [&str; 3] = [".env", ".env.example", ".env.production"];

/// Extract variable names from the first env file present in `dir`
///
/// Only the first candidate found is read. Lines are split on `=` and the
/// key side kept; comments and blank lines are skipped.
pub fn discover_env_keys<F: FileSystem>(fs: &F, dir: &Path) -> Vec<String> {
    for candidate in ENV_FILE_CANDIDATES {
        let path = dir.join(candidate);
        if !fs.is_file(&path) {
            continue;
        }
        match fs.read_to_string(&path) {
            Ok(content) => return parse_keys(&content),
            Err(_) => return Vec::new(),
        }
    }
    Vec::new()
}

fn parse_keys(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('=').map(|(key, _)| key.trim().to_string()))
        .filter(|key| !key.is_empty())
        .collect()
}
