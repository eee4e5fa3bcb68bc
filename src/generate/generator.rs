//! Template rendering and file output

use super::templates::{self, TemplateCategory};
use crate::config::CollectedConfig;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Relative path of the generated server init script
pub const INIT_SCRIPT_PATH: &str = "deploy/server-init.sh";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write deployment artifacts: {0}")]
    Io(#[from] anyhow::Error),
}

/// One written artifact and whether a previous version was backed up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub backed_up: bool,
}

pub struct Generator<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> Generator<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Render every artifact for `config` into `out_dir`
    ///
    /// Pre-existing files are copied to `<name>.backup` and then replaced.
    pub fn generate(
        &self,
        config: &CollectedConfig,
        out_dir: &Path,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        let category = TemplateCategory::for_archetype(config.project.archetype);
        let vars = substitutions(config);

        let mut outputs: Vec<(&str, &str)> = vec![
            ("Dockerfile", category.dockerfile()),
            (".dockerignore", category.dockerignore()),
            ("docker-compose.yml", templates::DOCKER_COMPOSE),
            (".github/workflows/deploy.yml", templates::DEPLOY_WORKFLOW),
            (INIT_SCRIPT_PATH, templates::SERVER_INIT),
        ];
        // Static bundles are fronted by nginx, so only they get a site config
        if config.project.archetype.is_spa() {
            outputs.push(("nginx.conf", templates::NGINX_CONF));
        }

        let mut generated = Vec::with_capacity(outputs.len());
        for (relative, template) in outputs {
            let rendered = render(template, &vars);
            let backed_up = self.write_artifact(out_dir, relative, &rendered)?;
            generated.push(GeneratedFile {
                path: PathBuf::from(relative),
                backed_up,
            });
        }

        info!(
            count = generated.len(),
            project = %config.project.name,
            "deployment artifacts written"
        );
        Ok(generated)
    }

    fn write_artifact(
        &self,
        out_dir: &Path,
        relative: &str,
        contents: &str,
    ) -> Result<bool, GenerateError> {
        let path = out_dir.join(relative);
        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent)?;
        }

        let backed_up = self.fs.is_file(&path);
        if backed_up {
            let backup = PathBuf::from(format!("{}.backup", path.display()));
            self.fs.copy(&path, &backup)?;
            debug!(path = %path.display(), "backed up existing file");
        }

        self.fs.write_string(&path, contents)?;
        Ok(backed_up)
    }
}

fn substitutions(config: &CollectedConfig) -> Vec<(&'static str, String)> {
    vec![
        ("APP_NAME", config.project.name.clone()),
        ("APP_PORT", config.project.port.to_string()),
        ("BUILD_CMD", config.project.build_command.clone()),
        ("START_CMD", config.project.start_command.clone()),
        ("SERVER_HOST", config.server.host.clone()),
        ("SSH_USER", config.server.user.clone()),
        ("DEPLOY_DIR", config.server.deploy_dir.clone()),
        ("DOMAIN", config.domain.name.clone()),
        ("REGISTRY", config.registry.clone()),
        ("PRODUCTION_BRANCH", config.branches.production.clone()),
        (
            "STAGING_BRANCH",
            config.branches.staging.clone().unwrap_or_default(),
        ),
    ]
}

fn render(template: &str, vars: &[(&'static str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
    }
    out
}
