//! Project classification from marker files and file contents

use super::{env_file, port, types::DetectionResult, Archetype, Language};
use crate::fs::FileSystem;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Python dependency manifests, checked in priority order
const PYTHON_MANIFESTS: [&str; 3] = ["requirements.txt", "pyproject.toml", "Pipfile"];

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to inspect project directory: {0}")]
    Io(#[from] anyhow::Error),

    #[error("failed to parse package.json: {0}")]
    ManifestParse(#[from] serde_json::Error),
}

/// Read-only project inspector
pub struct Detector<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> Detector<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Classify the project at `dir`
    ///
    /// Never fails on an unrecognized project; a missing directory or a
    /// malformed `package.json` does propagate as an error.
    pub fn detect(&self, dir: &Path) -> Result<DetectionResult, DetectError> {
        let entries = self.fs.read_dir(dir)?;
        let names: HashSet<String> = entries.into_iter().map(|e| e.name).collect();

        // Python markers win over Node markers when both are present
        let mut result = if PYTHON_MANIFESTS.iter().any(|m| names.contains(*m)) {
            self.detect_python(dir, &names)
        } else if names.contains("package.json") {
            self.detect_node(dir)?
        } else {
            DetectionResult::unknown()
        };

        if result.archetype == Some(Archetype::Flask) {
            self.refine_flask_factory(dir, &mut result);
        }

        if let Some(language) = result.language {
            if let Some(found) = port::scan_for_port(&self.fs, dir, language) {
                debug!(port = found, "source port overrides archetype default");
                result.port = found;
            }
        }

        result.has_dockerfile = names.contains("Dockerfile");
        result.has_ci = self.fs.is_dir(&dir.join(".github").join("workflows"));
        result.env_keys = env_file::discover_env_keys(&self.fs, dir);

        debug!(
            archetype = ?result.archetype,
            port = result.port,
            env_keys = result.env_keys.len(),
            "detection complete"
        );

        Ok(result)
    }

    fn detect_python(&self, dir: &Path, names: &HashSet<String>) -> DetectionResult {
        // Dependency content takes priority over entry-file fallbacks
        for manifest in PYTHON_MANIFESTS {
            if !names.contains(manifest) {
                continue;
            }
            let Ok(content) = self.fs.read_to_string(&dir.join(manifest)) else {
                continue;
            };
            let content = content.to_lowercase();
            if content.contains("fastapi") {
                return DetectionResult::seed(Archetype::Fastapi);
            }
            if content.contains("django") {
                return DetectionResult::seed(Archetype::Django);
            }
            if content.contains("flask") {
                return DetectionResult::seed(Archetype::Flask);
            }
            break;
        }

        let archetype = if names.contains("manage.py") {
            Some(Archetype::Django)
        } else if names.contains("app.py") {
            Some(Archetype::Flask)
        } else if names.contains("main.py") {
            Some(Archetype::Fastapi)
        } else {
            None
        };

        match archetype {
            Some(a) => DetectionResult::seed(a),
            None => DetectionResult {
                language: Some(Language::Python),
                ..DetectionResult::unknown()
            },
        }
    }

    fn detect_node(&self, dir: &Path) -> Result<DetectionResult, DetectError> {
        let content = self.fs.read_to_string(&dir.join("package.json"))?;
        let manifest: Value = serde_json::from_str(&content)?;

        let mut deps: HashSet<String> = HashSet::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(map) = manifest.get(section).and_then(|v| v.as_object()) {
                deps.extend(map.keys().cloned());
            }
        }

        let archetype = if deps.contains("@nestjs/core") {
            Some(Archetype::Nestjs)
        } else if deps.contains("next") {
            Some(Archetype::Nextjs)
        } else if deps.contains("nuxt") || deps.contains("nuxt3") {
            Some(Archetype::Nuxtjs)
        } else if deps.contains("vue") {
            Some(Archetype::VueSpa)
        } else if deps.contains("react") {
            Some(Archetype::ReactSpa)
        } else {
            None
        };

        Ok(match archetype {
            Some(a) => DetectionResult::seed(a),
            None => DetectionResult {
                language: Some(Language::Node),
                ..DetectionResult::unknown()
            },
        })
    }

    /// Detect the Flask application-factory convention: a `run.py` that
    /// calls `create_app` serves the app as `run:app` instead of `app:app`.
    fn refine_flask_factory(&self, dir: &Path, result: &mut DetectionResult) {
        let run_py = dir.join("run.py");
        if !self.fs.is_file(&run_py) {
            return;
        }
        let Ok(content) = self.fs.read_to_string(&run_py) else {
            return;
        };
        if content.contains("create_app") {
            result.start_command = result.start_command.replace("app:app", "run:app");
            result.entry_file = Some("run.py".to_string());
        }
    }
}
