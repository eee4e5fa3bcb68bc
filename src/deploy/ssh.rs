//! Remote server initialization over ssh
//!
//! The generated init script is streamed to `bash -s` on the remote host
//! through the system ssh binary. Key-based auth is used when the
//! configured key file exists; otherwise ssh falls back to its own
//! interactive password prompt on the tty.

use super::DeployError;
use crate::config::ServerSettings;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Run the local script at `script_path` on the configured server
///
/// Fails when the script is missing, the connection cannot be
/// established, or the remote exit code is non-zero.
pub async fn run_remote_script(
    server: &ServerSettings,
    script_path: &Path,
    key_override: Option<&Path>,
) -> Result<(), DeployError> {
    if !script_path.is_file() {
        return Err(DeployError::MissingInitScript(script_path.to_path_buf()));
    }
    let script = std::fs::read_to_string(script_path).map_err(|source| DeployError::ReadFile {
        path: script_path.to_path_buf(),
        source,
    })?;

    let key_path = super::expand_tilde(key_override.unwrap_or(&server.key_path));
    let target = format!("{}@{}", server.user, server.host);

    let mut command = Command::new("ssh");
    command.arg("-o").arg("StrictHostKeyChecking=accept-new");
    if key_path.is_file() {
        command.arg("-i").arg(key_path);
    } else {
        debug!(key = %key_path.display(), "key file not found, ssh will prompt for a password");
    }
    command.arg(&target).arg("bash -s");
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    info!(remote = %target, script = %script_path.display(), "running init script remotely");

    let mut child = command.spawn().map_err(|source| DeployError::Spawn {
        command: "ssh".to_string(),
        source,
    })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(script.as_bytes())
            .await
            .map_err(|source| DeployError::Spawn {
                command: "ssh".to_string(),
                source,
            })?;
        // closing stdin lets the remote bash run to completion
    }

    let status = child.wait().await.map_err(|source| DeployError::Spawn {
        command: "ssh".to_string(),
        source,
    })?;

    if !status.success() {
        return Err(DeployError::RemoteExit(status.code().unwrap_or(-1)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn server() -> ServerSettings {
        ServerSettings {
            host: "203.0.113.10".to_string(),
            user: "deploy".to_string(),
            key_path: PathBuf::from("/nonexistent/key"),
            deploy_dir: "/opt/apps".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_script_is_a_precondition_error() {
        let result =
            run_remote_script(&server(), Path::new("/nonexistent/server-init.sh"), None).await;

        assert!(matches!(result, Err(DeployError::MissingInitScript(_))));
    }
}
