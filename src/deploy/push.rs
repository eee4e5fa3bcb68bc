//! Push and pipeline verification
//!
//! Commits and pushes the generated configuration, then polls the latest
//! workflow run at a fixed interval until it completes or the iteration
//! cap is reached. No backoff and no retry; a timeout is reported, not
//! retried.

use super::DeployError;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const MAX_POLLS: u32 = 30;

/// Terminal state of the push-and-verify step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success,
    Failure { conclusion: String },
    /// The run did not complete within the polling window
    Timeout,
    /// gh is missing or the repository has no visible runs
    Unavailable,
}

/// Commit everything, push the production branch, and watch the pipeline
pub async fn push_and_verify(
    project_dir: &Path,
    branch: &str,
    message: &str,
) -> Result<PipelineOutcome, DeployError> {
    run_git(project_dir, &["add", "-A"]).await?;

    // A re-run with nothing new staged is not an error
    if let Err(e) = run_git(project_dir, &["commit", "-m", message]).await {
        match &e {
            DeployError::CommandFailed { stderr, .. } if stderr.contains("nothing to commit") => {
                info!("working tree clean, pushing the existing commit");
            }
            _ => return Err(e),
        }
    }

    run_git(project_dir, &["push", "origin", branch]).await?;
    info!(branch = branch, "pushed, watching the pipeline");

    verify_pipeline(project_dir).await
}

async fn verify_pipeline(project_dir: &Path) -> Result<PipelineOutcome, DeployError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("waiting for the pipeline run to appear");

    for attempt in 1..=MAX_POLLS {
        sleep(POLL_INTERVAL).await;

        let output = Command::new("gh")
            .args(["run", "list", "--limit", "1", "--json", "status,conclusion"])
            .current_dir(project_dir)
            .output()
            .await;

        let output = match output {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                warn!(
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "gh run list failed"
                );
                spinner.finish_and_clear();
                return Ok(PipelineOutcome::Unavailable);
            }
            Err(e) => {
                warn!(error = %e, "gh is not available");
                spinner.finish_and_clear();
                return Ok(PipelineOutcome::Unavailable);
            }
        };

        let runs: Vec<RunStatus> = serde_json::from_slice(&output.stdout).unwrap_or_default();
        let Some(run) = runs.first() else {
            spinner.set_message(format!(
                "no run visible yet ({}/{})",
                attempt, MAX_POLLS
            ));
            continue;
        };

        if run.status == "completed" {
            spinner.finish_and_clear();
            return Ok(match run.conclusion.as_deref() {
                Some("success") => PipelineOutcome::Success,
                other => PipelineOutcome::Failure {
                    conclusion: other.unwrap_or("unknown").to_string(),
                },
            });
        }

        debug!(status = %run.status, attempt, "pipeline still running");
        spinner.set_message(format!(
            "pipeline {} ({}/{})",
            run.status, attempt, MAX_POLLS
        ));
    }

    spinner.finish_and_clear();
    Ok(PipelineOutcome::Timeout)
}

async fn run_git(project_dir: &Path, args: &[&str]) -> Result<(), DeployError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(project_dir)
        .output()
        .await
        .map_err(|source| DeployError::Spawn {
            command: "git".to_string(),
            source,
        })?;

    if !output.status.success() {
        // git writes "nothing to commit" to stdout, keep both streams
        let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        return Err(DeployError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            status: output.status.code().unwrap_or(-1),
            stderr,
        });
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RunStatus {
    status: String,
    conclusion: Option<String>,
}
