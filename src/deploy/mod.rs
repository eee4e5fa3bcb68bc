// Post-generation deployment actions
//
// Four independent steps driven from the cached configuration: DNS
// verification (informative only), remote server initialization over ssh,
// GitHub Actions secret provisioning through the gh CLI, and a
// push-then-poll pipeline verification. External binaries (ssh, git, gh)
// are invoked as child processes; nothing here retries.

mod dns;
mod push;
mod secrets;
mod ssh;

pub use dns::{check_domain, DnsCheck};
pub use push::{push_and_verify, PipelineOutcome, MAX_POLLS, POLL_INTERVAL};
pub use secrets::{provision_secrets, SecretsOutcome};
pub use ssh::run_remote_script;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Expand a leading `~/` to the home directory
///
/// Key paths are collected as the operator typed them; the shell never
/// gets a chance to expand them for us.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("server init script not found at {0}; run `shipwright generate` first")]
    MissingInitScript(PathBuf),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("remote init script exited with status {0}")]
    RemoteExit(i32),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
