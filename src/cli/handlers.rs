//! Command handlers
//!
//! Each handler resolves its inputs, runs the relevant pipeline slice, and
//! maps the result to a process exit code. Missing preconditions (no cached
//! configuration, no init script) are fatal; environmental problems are
//! downgraded to warnings; remote failures halt the pipeline.

use super::commands::{CheckDnsArgs, GenerateArgs, InitArgs, SetupSecretsArgs, SetupServerArgs};
use super::output;
use crate::collect::{Collector, DialoguerPrompter, Prompter};
use crate::config::{
    load_cached_config, save_cached_config, CollectedConfig, GlobalStore, JsonGlobalStore,
};
use crate::deploy::{self, PipelineOutcome, SecretsOutcome};
use crate::detect::Detector;
use crate::fs::RealFileSystem;
use crate::generate::{GeneratedFile, Generator, INIT_SCRIPT_PATH};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub async fn handle_init(args: &InitArgs) -> i32 {
    match run_init(args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            1
        }
    }
}

pub async fn handle_generate(args: &GenerateArgs) -> i32 {
    match run_generate(args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            1
        }
    }
}

pub async fn handle_check_dns(args: &CheckDnsArgs) -> i32 {
    match run_check_dns(args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            1
        }
    }
}

pub async fn handle_setup_server(args: &SetupServerArgs) -> i32 {
    match run_setup_server(args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            1
        }
    }
}

pub async fn handle_setup_secrets(args: &SetupSecretsArgs) -> i32 {
    match run_setup_secrets(args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            1
        }
    }
}

async fn run_init(args: &InitArgs) -> Result<i32> {
    let dir = resolve_project_dir(args.project_dir.as_deref())?;

    let Some(config) = prepare_config(&dir, args.config.as_deref())? else {
        output::print_info("cancelled, nothing was generated");
        return Ok(0);
    };

    let files = generate_and_persist(&dir, &config)?;
    output::print_success("deployment artifacts generated:");
    print!("{}", output::generation_report(&files));

    // The deployment stages run off the persisted cache, exactly like the
    // standalone commands would
    let config = load_cached_config(&RealFileSystem::new(), &dir)?;

    let prompter = DialoguerPrompter::new();

    if config.domain.enabled
        && prompter.confirm("Verify DNS for the domain now?", true)?
    {
        let check = deploy::check_domain(&config.domain.name, &config.server.host).await;
        output::report_dns(&check);
    }

    if prompter.confirm("Initialize the server over SSH now?", false)? {
        deploy::run_remote_script(&config.server, &dir.join(INIT_SCRIPT_PATH), None).await?;
        output::print_success("server initialized");
    }

    if prompter.confirm("Upload GitHub Actions secrets now?", false)? {
        match deploy::provision_secrets(&config, &dir).await? {
            SecretsOutcome::Provisioned { count } => {
                output::print_success(&format!("{} secrets uploaded", count));
            }
            SecretsOutcome::Skipped { reason } => output::print_warning(&reason),
        }
    }

    if prompter.confirm("Commit and push to trigger the first deployment?", false)? {
        let outcome = deploy::push_and_verify(
            &dir,
            &config.branches.production,
            "Add deployment configuration",
        )
        .await?;
        output::report_pipeline(&outcome);
        if matches!(outcome, PipelineOutcome::Failure { .. }) {
            return Ok(1);
        }
    }

    Ok(0)
}

async fn run_generate(args: &GenerateArgs) -> Result<i32> {
    let dir = resolve_project_dir(args.project_dir.as_deref())?;

    let Some(config) = prepare_config(&dir, args.config.as_deref())? else {
        output::print_info("cancelled, nothing was generated");
        return Ok(0);
    };

    let files = generate_and_persist(&dir, &config)?;
    output::print_success("deployment artifacts generated:");
    print!("{}", output::generation_report(&files));
    output::print_info("run `shipwright init` or the setup-* commands to deploy");

    Ok(0)
}

async fn run_check_dns(args: &CheckDnsArgs) -> Result<i32> {
    let dir = resolve_project_dir(args.project_dir.as_deref())?;
    let config = load_cached_config(&RealFileSystem::new(), &dir)?;

    if !config.domain.enabled {
        output::print_info("no domain is configured for this project");
        return Ok(0);
    }

    let check = deploy::check_domain(&config.domain.name, &config.server.host).await;
    output::report_dns(&check);

    // informative only; a mismatch never fails the command
    Ok(0)
}

async fn run_setup_server(args: &SetupServerArgs) -> Result<i32> {
    let dir = resolve_project_dir(args.project_dir.as_deref())?;
    let config = load_cached_config(&RealFileSystem::new(), &dir)?;

    deploy::run_remote_script(
        &config.server,
        &dir.join(INIT_SCRIPT_PATH),
        args.key.as_deref(),
    )
    .await?;

    output::print_success(&format!(
        "server {}@{} initialized",
        config.server.user, config.server.host
    ));
    Ok(0)
}

async fn run_setup_secrets(args: &SetupSecretsArgs) -> Result<i32> {
    let dir = resolve_project_dir(args.project_dir.as_deref())?;
    let config = load_cached_config(&RealFileSystem::new(), &dir)?;

    match deploy::provision_secrets(&config, &dir).await? {
        SecretsOutcome::Provisioned { count } => {
            output::print_success(&format!("{} secrets uploaded", count));
            Ok(0)
        }
        SecretsOutcome::Skipped { reason } => {
            output::print_warning(&reason);
            Ok(0)
        }
    }
}

/// Collect a configuration, either interactively or from a file override
///
/// Returns `None` when the operator cancels at review.
fn prepare_config(dir: &Path, config_override: Option<&Path>) -> Result<Option<CollectedConfig>> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {:?}", path))?;
        let config: CollectedConfig = serde_json::from_str(&content)
            .with_context(|| format!("configuration file {:?} is not valid", path))?;
        if let Err(violations) = config.validate() {
            let list: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            return Err(anyhow!(
                "configuration file {:?} is invalid: {}",
                path,
                list.join("; ")
            ));
        }
        debug!(path = %path.display(), "using configuration file, skipping prompts");
        return Ok(Some(config));
    }

    let detection = Detector::new(RealFileSystem::new()).detect(dir)?;
    print!("{}", output::detection_summary(&detection));

    let store = JsonGlobalStore::default_location()?;
    let prompter = DialoguerPrompter::new();
    let collector = Collector::new(&prompter, &store);

    Ok(collector.collect(&detection, &default_project_name(dir))?)
}

fn generate_and_persist(dir: &Path, config: &CollectedConfig) -> Result<Vec<GeneratedFile>> {
    let fs = RealFileSystem::new();
    let files = Generator::new(RealFileSystem::new()).generate(config, dir)?;
    save_cached_config(&fs, dir, config)?;

    // History is best-effort; a broken global store must not undo the work
    match JsonGlobalStore::default_location() {
        Ok(store) => {
            if let Err(e) = store.record_project(&config.project.name, Some(config.project.archetype))
            {
                warn!(error = %e, "could not record the project in the global history");
            }
        }
        Err(e) => warn!(error = %e, "could not open the global store"),
    }

    Ok(files)
}

fn resolve_project_dir(project_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match project_dir {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("failed to resolve the current directory")?,
    };
    if !dir.is_dir() {
        return Err(anyhow!("project directory {:?} does not exist", dir));
    }
    Ok(dir)
}

/// Derive a name candidate from the directory, coerced into the allowed
/// charset
fn default_project_name(dir: &Path) -> String {
    let raw = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('-').to_string();

    if cleaned.is_empty() {
        "app".to_string()
    } else {
        cleaned
    }
}
