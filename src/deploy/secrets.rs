//! GitHub Actions secret provisioning through the gh CLI
//!
//! Missing tooling is remediated where a remediation is known: gh is
//! installed via the platform package manager and authentication launches
//! the interactive login flow. When no remediation exists the step is
//! skipped with a warning instead of failing the pipeline.

use super::DeployError;
use crate::config::CollectedConfig;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// How the provisioning step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsOutcome {
    /// All secrets uploaded
    Provisioned { count: usize },
    /// gh could not be made available; step skipped
    Skipped { reason: String },
}

/// Upload the deployment secrets for `config` to the repository in
/// `project_dir`
pub async fn provision_secrets(
    config: &CollectedConfig,
    project_dir: &Path,
) -> Result<SecretsOutcome, DeployError> {
    if !ensure_gh_installed().await? {
        return Ok(SecretsOutcome::Skipped {
            reason: "the gh CLI is not installed and could not be installed automatically"
                .to_string(),
        });
    }
    ensure_gh_authenticated().await?;

    let mut secrets: Vec<(&str, String)> = vec![
        ("SERVER_HOST", config.server.host.clone()),
        ("SERVER_USER", config.server.user.clone()),
        ("DEPLOY_PATH", config.server.deploy_dir.clone()),
    ];

    let key_path = super::expand_tilde(&config.server.key_path);
    match std::fs::read_to_string(&key_path) {
        Ok(key) => secrets.push(("SSH_PRIVATE_KEY", key)),
        Err(e) => warn!(
            key = %key_path.display(),
            error = %e,
            "skipping SSH_PRIVATE_KEY secret, key file is not readable"
        ),
    }

    let count = secrets.len();
    for (name, value) in secrets {
        set_secret(project_dir, name, &value).await?;
        info!(secret = name, "uploaded");
    }

    Ok(SecretsOutcome::Provisioned { count })
}

/// Check for gh and attempt a platform install when absent
///
/// Returns false when gh stays unavailable; callers downgrade to a
/// warning in that case.
async fn ensure_gh_installed() -> Result<bool, DeployError> {
    if command_succeeds("gh", &["--version"]).await {
        return Ok(true);
    }

    if cfg!(target_os = "macos") {
        info!("gh not found, attempting `brew install gh`");
        if run_inherited("brew", &["install", "gh"]).await.is_ok() {
            return Ok(command_succeeds("gh", &["--version"]).await);
        }
    } else if cfg!(target_os = "linux") && command_succeeds("apt-get", &["--version"]).await {
        info!("gh not found, attempting `apt-get install gh`");
        if run_inherited("sudo", &["apt-get", "install", "-y", "gh"])
            .await
            .is_ok()
        {
            return Ok(command_succeeds("gh", &["--version"]).await);
        }
    }

    warn!("install the GitHub CLI manually: https://cli.github.com");
    Ok(false)
}

async fn ensure_gh_authenticated() -> Result<(), DeployError> {
    if command_succeeds("gh", &["auth", "status"]).await {
        debug!("gh is already authenticated");
        return Ok(());
    }
    info!("gh is not authenticated, starting the login flow");
    run_inherited("gh", &["auth", "login"]).await
}

async fn set_secret(project_dir: &Path, name: &str, value: &str) -> Result<(), DeployError> {
    let output = Command::new("gh")
        .args(["secret", "set", name, "--body", value])
        .current_dir(project_dir)
        .output()
        .await
        .map_err(|source| DeployError::Spawn {
            command: "gh secret set".to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(DeployError::CommandFailed {
            command: format!("gh secret set {}", name),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Quiet probe: success means the binary exists and the call worked
async fn command_succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Run with the operator's terminal attached, for interactive flows
async fn run_inherited(program: &str, args: &[&str]) -> Result<(), DeployError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| DeployError::Spawn {
            command: program.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(DeployError::CommandFailed {
            command: format!("{} {}", program, args.join(" ")),
            status: status.code().unwrap_or(-1),
            stderr: String::new(),
        });
    }
    Ok(())
}
