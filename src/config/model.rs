//! Collected configuration types
//!
//! `CollectedConfig` is the single source of truth produced by the
//! interactive flow. The generator consumes it directly and the per-project
//! cache persists it, so every standalone command reloads the same record
//! instead of re-deriving anything.

use crate::detect::{Archetype, Language};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Project names end up in image tags, compose service names and file
/// paths, so the charset is restricted to lowercase alphanumerics and dashes
pub fn is_valid_project_name(name: &str) -> bool {
    Regex::new(r"^[a-z0-9-]+$")
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub name: String,
    pub archetype: Archetype,
    pub language: Language,
    pub port: u16,
    pub build_command: String,
    pub start_command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub user: String,
    pub key_path: PathBuf,
    pub deploy_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSettings {
    pub enabled: bool,
    pub name: String,
    pub https: bool,
}

impl DomainSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            name: String::new(),
            https: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSettings {
    pub production: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging: Option<String>,
}

/// A named, reusable server connection record in the user-global registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerProfile {
    pub host: String,
    pub user: String,
    pub key_path: PathBuf,
    pub deploy_dir: String,
}

/// The full validated configuration for one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedConfig {
    pub project: ProjectSettings,
    pub server: ServerSettings,
    pub domain: DomainSettings,
    pub secrets: Vec<String>,
    pub branches: BranchSettings,
    pub registry: String,
}

/// Violations reported by [`CollectedConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigViolation {
    InvalidProjectName(String),
    ZeroPort,
    EmptyDomain,
    EmptyProductionBranch,
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigViolation::InvalidProjectName(name) => write!(
                f,
                "project name '{}' must match [a-z0-9-]+ (lowercase letters, digits, dashes)",
                name
            ),
            ConfigViolation::ZeroPort => write!(f, "port must be a positive integer"),
            ConfigViolation::EmptyDomain => {
                write!(f, "domain name must not be empty when the domain is enabled")
            }
            ConfigViolation::EmptyProductionBranch => {
                write!(f, "production branch must not be empty")
            }
        }
    }
}

impl CollectedConfig {
    /// Check the structural invariants
    ///
    /// The interactive flow enforces these at prompt time; this exists for
    /// configurations loaded from a file with `--config`.
    pub fn validate(&self) -> Result<(), Vec<ConfigViolation>> {
        let mut violations = Vec::new();

        if !is_valid_project_name(&self.project.name) {
            violations.push(ConfigViolation::InvalidProjectName(
                self.project.name.clone(),
            ));
        }
        if self.project.port == 0 {
            violations.push(ConfigViolation::ZeroPort);
        }
        if self.domain.enabled && self.domain.name.trim().is_empty() {
            violations.push(ConfigViolation::EmptyDomain);
        }
        if self.branches.production.trim().is_empty() {
            violations.push(ConfigViolation::EmptyProductionBranch);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
