//! Detection result types

use super::{Archetype, Language};
use serde::{Deserialize, Serialize};

/// Everything the detector could infer about a project directory
///
/// Produced once per invocation and immutable afterwards. An unrecognized
/// project is a valid result (`archetype: None`) rather than an error;
/// downstream prompts fall back to generic defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub language: Option<Language>,
    pub archetype: Option<Archetype>,
    pub port: u16,
    pub build_command: String,
    pub start_command: String,
    pub entry_file: Option<String>,
    pub has_dockerfile: bool,
    pub has_ci: bool,
    pub env_keys: Vec<String>,
}

impl DetectionResult {
    /// Result for a directory with no recognizable markers
    pub fn unknown() -> Self {
        Self {
            language: None,
            archetype: None,
            port: 3000,
            build_command: String::new(),
            start_command: String::new(),
            entry_file: None,
            has_dockerfile: false,
            has_ci: false,
            env_keys: Vec::new(),
        }
    }

    /// Seed runtime fields from an archetype's static defaults
    pub fn seed(archetype: Archetype) -> Self {
        let defaults = archetype.defaults();
        Self {
            language: Some(archetype.language()),
            archetype: Some(archetype),
            port: defaults.port,
            build_command: defaults.build_command.to_string(),
            start_command: defaults.start_command.to_string(),
            entry_file: defaults.entry_file.map(String::from),
            has_dockerfile: false,
            has_ci: false,
            env_keys: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_has_no_archetype() {
        let result = DetectionResult::unknown();
        assert!(result.archetype.is_none());
        assert!(result.language.is_none());
        assert_eq!(result.port, 3000);
    }

    #[test]
    fn test_seed_copies_defaults() {
        let result = DetectionResult::seed(Archetype::Fastapi);
        assert_eq!(result.language, Some(Language::Python));
        assert_eq!(result.port, 8000);
        assert!(result.start_command.contains("uvicorn"));
        assert_eq!(result.entry_file.as_deref(), Some("main.py"));
    }
}
