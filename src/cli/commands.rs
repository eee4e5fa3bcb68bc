use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Interactive deployment bootstrapper
#[derive(Parser, Debug)]
#[command(
    name = "shipwright",
    about = "Interactive deployment bootstrapper for web projects",
    version,
    long_about = "shipwright inspects a project directory, asks a few questions, renders \
                  Docker, compose, CI workflow and server-init artifacts from templates, \
                  and can then drive the first deployment: DNS verification, server \
                  initialization over ssh, GitHub Actions secrets, and a push that is \
                  watched until the pipeline finishes."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the full pipeline: detect, configure, generate, deploy",
        long_about = "Detects the project type, collects the configuration interactively, \
                      renders all deployment artifacts, and offers to run the deployment \
                      steps (DNS check, server init, secrets, push) one by one.\n\n\
                      Examples:\n  \
                      shipwright init\n  \
                      shipwright init --project-dir ../my-app\n  \
                      shipwright init --config ci-config.json"
    )]
    Init(InitArgs),

    #[command(
        about = "Detect, configure and render artifacts without deploying",
        long_about = "Same as init but stops after writing the files and the project cache.\n\n\
                      Examples:\n  \
                      shipwright generate\n  \
                      shipwright generate --config ci-config.json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Check whether the configured domain points at the server",
        name = "check-dns"
    )]
    CheckDns(CheckDnsArgs),

    #[command(
        about = "Run the generated init script on the configured server",
        name = "setup-server",
        long_about = "Streams deploy/server-init.sh to the configured host over ssh. \
                      Requires a cached configuration from a previous init or generate.\n\n\
                      Examples:\n  \
                      shipwright setup-server\n  \
                      shipwright setup-server --key ~/.ssh/deploy_ed25519"
    )]
    SetupServer(SetupServerArgs),

    #[command(
        about = "Upload deployment secrets to GitHub Actions",
        name = "setup-secrets"
    )]
    SetupSecrets(SetupSecretsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        help = "Project directory (defaults to the current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Load the configuration from a JSON file instead of prompting"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        help = "Project directory (defaults to the current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Load the configuration from a JSON file instead of prompting"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckDnsArgs {
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        help = "Project directory (defaults to the current directory)"
    )]
    pub project_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SetupServerArgs {
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        help = "Project directory (defaults to the current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(
        short = 'k',
        long,
        value_name = "FILE",
        help = "SSH private key to use instead of the configured one"
    )]
    pub key: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SetupSecretsArgs {
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        help = "Project directory (defaults to the current directory)"
    )]
    pub project_dir: Option<PathBuf>,
}
