//! Configuration collection state machine
//!
//! States run in a fixed order: project, server, domain, secrets, branches,
//! then review. Review is the only state with edges back into earlier
//! states; it re-runs one section at a time and loops until the operator
//! confirms or cancels. Secrets and branches deliberately have no edit
//! edge from review.

use super::prompter::Prompter;
use crate::config::{
    is_valid_project_name, BranchSettings, CollectedConfig, DomainSettings, GlobalStore,
    ProjectSettings, ServerProfile, ServerSettings, StoreError,
};
use crate::detect::{Archetype, DetectionResult};
use console::style;
use regex::Regex;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Env keys matching this pattern are pre-checked in the secrets prompt
const SECRET_HINT_PATTERN: &str = r"(?i)secret|password|key|token|api";

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("prompt failed: {0}")]
    Prompt(#[from] anyhow::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one pass through the review screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Confirm,
    EditProject,
    EditServer,
    EditDomain,
    Cancel,
}

const REVIEW_CHOICES: [&str; 5] = [
    "Looks good, generate the files",
    "Edit project settings",
    "Edit server settings",
    "Edit domain settings",
    "Cancel",
];

pub struct Collector<'a, P: Prompter, S: GlobalStore> {
    prompter: &'a P,
    store: &'a S,
}

impl<'a, P: Prompter, S: GlobalStore> Collector<'a, P, S> {
    pub fn new(prompter: &'a P, store: &'a S) -> Self {
        Self { prompter, store }
    }

    /// Run the full collection flow
    ///
    /// Returns `None` when the operator cancels at review; nothing should
    /// be generated in that case. Note that a server profile added during
    /// collection has already been persisted by then.
    pub fn collect(
        &self,
        detection: &DetectionResult,
        default_name: &str,
    ) -> Result<Option<CollectedConfig>, CollectError> {
        let project = self.collect_project(detection, default_name)?;
        let server = self.collect_server()?;
        let domain = self.collect_domain()?;
        let secrets = self.collect_secrets(&detection.env_keys)?;
        let branches = self.collect_branches()?;

        let registry = default_registry(&project.name);
        let mut config = CollectedConfig {
            project,
            server,
            domain,
            secrets,
            branches,
            registry,
        };

        loop {
            match self.review(&config)? {
                ReviewAction::Confirm => {
                    debug!(project = %config.project.name, "configuration confirmed");
                    return Ok(Some(config));
                }
                ReviewAction::EditProject => {
                    config.project = self.collect_project(detection, &config.project.name)?;
                    config.registry = default_registry(&config.project.name);
                }
                ReviewAction::EditServer => {
                    config.server = self.collect_server()?;
                }
                ReviewAction::EditDomain => {
                    config.domain = self.collect_domain()?;
                }
                ReviewAction::Cancel => {
                    debug!("configuration cancelled at review");
                    return Ok(None);
                }
            }
        }
    }

    fn collect_project(
        &self,
        detection: &DetectionResult,
        default_name: &str,
    ) -> Result<ProjectSettings, CollectError> {
        let name = loop {
            let candidate = self.prompter.input("Project name", Some(default_name))?;
            if is_valid_project_name(&candidate) {
                break candidate;
            }
            println!(
                "{} project names may only contain lowercase letters, digits, and dashes",
                style("!").yellow().bold()
            );
        };

        let items: Vec<&str> = Archetype::ALL.iter().map(Archetype::as_str).collect();
        let default_index = detection
            .archetype
            .and_then(|a| Archetype::ALL.iter().position(|x| *x == a))
            .unwrap_or(0);
        let index = self.prompter.select("Project type", &items, default_index)?;
        let archetype = Archetype::ALL[index];

        // Keep detection-derived values (including any source port override)
        // when the operator sticks with the detected type
        let (port_default, build_default, start_default) =
            if detection.archetype == Some(archetype) {
                (
                    detection.port,
                    detection.build_command.clone(),
                    detection.start_command.clone(),
                )
            } else {
                let defaults = archetype.defaults();
                (
                    defaults.port,
                    defaults.build_command.to_string(),
                    defaults.start_command.to_string(),
                )
            };

        let port = loop {
            let raw = self
                .prompter
                .input("Application port", Some(&port_default.to_string()))?;
            match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => break port,
                _ => println!(
                    "{} port must be a positive integer",
                    style("!").yellow().bold()
                ),
            }
        };

        let build_command = self.prompter.input("Build command", Some(&build_default))?;
        let start_command = self.prompter.input("Start command", Some(&start_default))?;

        Ok(ProjectSettings {
            name,
            language: archetype.language(),
            archetype,
            port,
            build_command,
            start_command,
        })
    }

    fn collect_server(&self) -> Result<ServerSettings, CollectError> {
        let global = self.store.load()?;

        if !global.servers.is_empty() {
            let mut labels: Vec<String> = global.servers.keys().cloned().collect();
            labels.push("Add a new server".to_string());
            let items: Vec<&str> = labels.iter().map(String::as_str).collect();

            let index = self.prompter.select("Deploy target", &items, 0)?;
            if index < global.servers.len() {
                let profile = &global.servers[&labels[index]];
                // Only the deploy directory is overridable on a saved profile
                let deploy_dir = self
                    .prompter
                    .input("Deploy directory", Some(&profile.deploy_dir))?;
                return Ok(ServerSettings {
                    host: profile.host.clone(),
                    user: profile.user.clone(),
                    key_path: profile.key_path.clone(),
                    deploy_dir,
                });
            }
        }

        let host = self.required_input("Server host or IP")?;
        let user = self.prompter.input("SSH user", Some("root"))?;
        let key_path = PathBuf::from(
            self.prompter
                .input("SSH private key path", Some("~/.ssh/id_rsa"))?,
        );
        let deploy_dir = self.prompter.input("Deploy directory", Some("/opt/apps"))?;
        let label = self.required_input("Save this server as")?;

        let profile = ServerProfile {
            host: host.clone(),
            user: user.clone(),
            key_path: key_path.clone(),
            deploy_dir: deploy_dir.clone(),
        };
        // Persisted as soon as it is entered; the profile survives a later
        // cancel, and re-using a label replaces the stored profile
        self.store.save_profile(&label, &profile)?;
        debug!(label = %label, "saved server profile");

        Ok(ServerSettings {
            host,
            user,
            key_path,
            deploy_dir,
        })
    }

    fn collect_domain(&self) -> Result<DomainSettings, CollectError> {
        if !self.prompter.confirm("Point a domain at this app?", true)? {
            return Ok(DomainSettings::disabled());
        }

        let name = self.required_input("Domain name")?;
        let https = self.prompter.confirm("Enable HTTPS?", true)?;

        Ok(DomainSettings {
            enabled: true,
            name,
            https,
        })
    }

    fn collect_secrets(&self, env_keys: &[String]) -> Result<Vec<String>, CollectError> {
        if env_keys.is_empty() {
            return Ok(Vec::new());
        }

        let hint = Regex::new(SECRET_HINT_PATTERN).ok();
        let defaults: Vec<bool> = env_keys
            .iter()
            .map(|key| hint.as_ref().map(|re| re.is_match(key)).unwrap_or(false))
            .collect();
        let items: Vec<&str> = env_keys.iter().map(String::as_str).collect();

        let chosen =
            self.prompter
                .multi_select("Variables to store as CI secrets", &items, &defaults)?;

        Ok(chosen.into_iter().map(|i| env_keys[i].clone()).collect())
    }

    fn collect_branches(&self) -> Result<BranchSettings, CollectError> {
        let production = loop {
            let candidate = self.prompter.input("Production branch", Some("main"))?;
            if !candidate.trim().is_empty() {
                break candidate;
            }
            println!(
                "{} production branch must not be empty",
                style("!").yellow().bold()
            );
        };

        let staging = if self.prompter.confirm("Use a staging branch?", false)? {
            Some(self.prompter.input("Staging branch", Some("develop"))?)
        } else {
            None
        };

        Ok(BranchSettings {
            production,
            staging,
        })
    }

    fn review(&self, config: &CollectedConfig) -> Result<ReviewAction, CollectError> {
        println!("\n{}", render_summary(config));

        let index = self
            .prompter
            .select("Everything correct?", &REVIEW_CHOICES, 0)?;

        Ok(match index {
            0 => ReviewAction::Confirm,
            1 => ReviewAction::EditProject,
            2 => ReviewAction::EditServer,
            3 => ReviewAction::EditDomain,
            _ => ReviewAction::Cancel,
        })
    }

    fn required_input(&self, prompt: &str) -> Result<String, CollectError> {
        loop {
            let value = self.prompter.input(prompt, None)?;
            if !value.trim().is_empty() {
                return Ok(value);
            }
            println!("{} a value is required", style("!").yellow().bold());
        }
    }
}

fn default_registry(project_name: &str) -> String {
    format!("ghcr.io/{}", project_name)
}

/// Human-readable configuration summary shown at review
pub fn render_summary(config: &CollectedConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Configuration summary").bold());
    let _ = writeln!(
        out,
        "  Project:  {} ({}, port {})",
        config.project.name, config.project.archetype, config.project.port
    );
    let _ = writeln!(out, "  Build:    {}", config.project.build_command);
    let _ = writeln!(out, "  Start:    {}", config.project.start_command);
    let _ = writeln!(
        out,
        "  Server:   {}@{} -> {}",
        config.server.user, config.server.host, config.server.deploy_dir
    );
    if config.domain.enabled {
        let _ = writeln!(
            out,
            "  Domain:   {} (https: {})",
            config.domain.name, config.domain.https
        );
    } else {
        let _ = writeln!(out, "  Domain:   none");
    }
    if config.secrets.is_empty() {
        let _ = writeln!(out, "  Secrets:  none");
    } else {
        let _ = writeln!(out, "  Secrets:  {}", config.secrets.join(", "));
    }
    match &config.branches.staging {
        Some(staging) => {
            let _ = writeln!(
                out,
                "  Branches: {} (production), {} (staging)",
                config.branches.production, staging
            );
        }
        None => {
            let _ = writeln!(out, "  Branches: {} (production)", config.branches.production);
        }
    }
    let _ = writeln!(out, "  Registry: {}", config.registry);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::prompter::{Answer, ScriptedPrompter};
    use crate::config::{GlobalConfig, InMemoryGlobalStore};
    use crate::detect::DetectionResult;

    fn flask_detection() -> DetectionResult {
        let mut detection = DetectionResult::seed(Archetype::Flask);
        detection.env_keys = vec![
            "DATABASE_URL".to_string(),
            "SECRET_KEY".to_string(),
            "DEBUG".to_string(),
        ];
        detection
    }

    /// Answers driving a fresh run up to (not including) review:
    /// project name, type, port, build, start; host, user, key, dir, label;
    /// domain gate; secrets; production branch, staging gate.
    fn answers_up_to_review() -> Vec<Answer> {
        vec![
            Answer::text("my-app"),
            Answer::Choice(0),
            Answer::text(""),
            Answer::text(""),
            Answer::text(""),
            Answer::text("203.0.113.10"),
            Answer::text("deploy"),
            Answer::text(""),
            Answer::text(""),
            Answer::text("hetzner"),
            Answer::Flag(false),
            Answer::Choices(vec![1]),
            Answer::text(""),
            Answer::Flag(false),
        ]
    }

    #[test]
    fn test_confirm_returns_config() {
        let mut answers = answers_up_to_review();
        answers.push(Answer::Choice(0)); // confirm
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap()
            .expect("confirmed config");

        assert_eq!(config.project.name, "my-app");
        assert_eq!(config.project.archetype, Archetype::Flask);
        assert_eq!(config.project.port, 5000);
        assert_eq!(config.server.host, "203.0.113.10");
        assert!(!config.domain.enabled);
        assert_eq!(config.secrets, vec!["SECRET_KEY"]);
        assert_eq!(config.branches.production, "main");
        assert!(config.branches.staging.is_none());
        assert_eq!(config.registry, "ghcr.io/my-app");
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_invalid_name_reprompts_in_place() {
        let mut answers = vec![
            Answer::text("My App"),
            Answer::text("my_app"),
            Answer::text("my-app"),
        ];
        answers.extend(answers_up_to_review().into_iter().skip(1));
        answers.push(Answer::Choice(0));
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "starter")
            .unwrap()
            .unwrap();

        assert_eq!(config.project.name, "my-app");
    }

    #[test]
    fn test_cancel_returns_none() {
        let mut answers = answers_up_to_review();
        answers.push(Answer::Choice(4)); // cancel
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let result = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_cancel_still_persists_new_profile() {
        let mut answers = answers_up_to_review();
        answers.push(Answer::Choice(4));
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let result = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap();
        assert!(result.is_none());

        let global = store.load().unwrap();
        assert!(global.servers.contains_key("hetzner"));
    }

    #[test]
    fn test_edit_server_then_confirm_keeps_other_sections() {
        let mut answers = answers_up_to_review();
        answers.push(Answer::Choice(2)); // edit server
        // the profile saved moments ago is now offered; pick "Add a new server"
        answers.extend(vec![
            Answer::Choice(1),
            Answer::text("203.0.113.99"),
            Answer::text("admin"),
            Answer::text(""),
            Answer::text("/srv/www"),
            Answer::text("backup-box"),
        ]);
        answers.push(Answer::Choice(0)); // confirm
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap()
            .unwrap();

        assert_eq!(config.server.host, "203.0.113.99");
        assert_eq!(config.server.user, "admin");
        assert_eq!(config.server.deploy_dir, "/srv/www");
        // untouched sections survive the edit
        assert_eq!(config.project.name, "my-app");
        assert_eq!(config.project.port, 5000);
        assert!(!config.domain.enabled);
        assert_eq!(config.secrets, vec!["SECRET_KEY"]);
    }

    #[test]
    fn test_existing_profile_only_deploy_dir_overridable() {
        let mut global = GlobalConfig::default();
        global.servers.insert(
            "prod".to_string(),
            ServerProfile {
                host: "198.51.100.4".to_string(),
                user: "deploy".to_string(),
                key_path: PathBuf::from("/home/me/.ssh/id_ed25519"),
                deploy_dir: "/opt/apps".to_string(),
            },
        );
        let store = InMemoryGlobalStore::with_config(global);

        let answers = vec![
            Answer::text("my-app"),
            Answer::Choice(0),
            Answer::text(""),
            Answer::text(""),
            Answer::text(""),
            Answer::Choice(0),          // pick saved profile "prod"
            Answer::text("/srv/other"), // deploy dir override
            Answer::Flag(false),
            Answer::Choices(vec![]),
            Answer::text(""),
            Answer::Flag(false),
            Answer::Choice(0),
        ];
        let prompter = ScriptedPrompter::new(answers);

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap()
            .unwrap();

        assert_eq!(config.server.host, "198.51.100.4");
        assert_eq!(config.server.deploy_dir, "/srv/other");
    }

    #[test]
    fn test_no_env_keys_skips_secret_prompt() {
        let mut detection = DetectionResult::seed(Archetype::Flask);
        detection.env_keys = Vec::new();

        // same as a fresh run but without the multi-select answer
        let answers = vec![
            Answer::text("my-app"),
            Answer::Choice(0),
            Answer::text(""),
            Answer::text(""),
            Answer::text(""),
            Answer::text("203.0.113.10"),
            Answer::text("deploy"),
            Answer::text(""),
            Answer::text(""),
            Answer::text("hetzner"),
            Answer::Flag(false),
            Answer::text(""),
            Answer::Flag(false),
            Answer::Choice(0),
        ];
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&detection, "my-app")
            .unwrap()
            .unwrap();

        assert!(config.secrets.is_empty());
    }

    #[test]
    fn test_staging_branch_collected_when_accepted() {
        let mut answers = answers_up_to_review();
        // replace the trailing staging gate with accept + name
        answers.pop();
        answers.push(Answer::Flag(true));
        answers.push(Answer::text(""));
        answers.push(Answer::Choice(0));
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap()
            .unwrap();

        assert_eq!(config.branches.staging.as_deref(), Some("develop"));
    }

    #[test]
    fn test_switching_archetype_swaps_defaults() {
        let mut answers = answers_up_to_review();
        answers[1] = Answer::Choice(3); // nextjs instead of detected flask
        answers.push(Answer::Choice(0));
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap()
            .unwrap();

        assert_eq!(config.project.archetype, Archetype::Nextjs);
        assert_eq!(config.project.port, 3000);
        assert_eq!(config.project.build_command, "npm run build");
    }

    #[test]
    fn test_summary_mentions_every_section() {
        let mut answers = answers_up_to_review();
        answers.push(Answer::Choice(0));
        let prompter = ScriptedPrompter::new(answers);
        let store = InMemoryGlobalStore::new();

        let config = Collector::new(&prompter, &store)
            .collect(&flask_detection(), "my-app")
            .unwrap()
            .unwrap();

        let summary = render_summary(&config);
        assert!(summary.contains("my-app"));
        assert!(summary.contains("203.0.113.10"));
        assert!(summary.contains("SECRET_KEY"));
        assert!(summary.contains("main"));
        assert!(summary.contains("ghcr.io/my-app"));
    }
}
