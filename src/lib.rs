//! shipwright - interactive deployment bootstrapper
//!
//! This library inspects a project directory, collects a deployment
//! configuration through an interactive review flow, renders Docker/CI
//! artifacts from templates, and drives the first deployment using the
//! system ssh, git, and gh binaries.
//!
//! # Core Concepts
//!
//! - **Detection**: static, read-only inference of the project archetype,
//!   port, and commands from marker files and file contents
//! - **Collection**: a prompt-driven state machine ending in a review loop
//!   that can re-edit individual sections before confirming
//! - **Generation**: deterministic template substitution into a fixed set
//!   of deployment artifacts, backing up anything it would overwrite
//! - **Deployment**: DNS verification, remote server init over ssh, secret
//!   provisioning via the gh CLI, and a push watched until the pipeline
//!   completes
//!
//! # Project Structure
//!
//! - [`detect`]: archetype/port/command inference
//! - [`collect`]: the interactive configuration flow
//! - [`generate`]: template rendering and file output
//! - [`deploy`]: DNS, ssh, secrets, and push-verification steps
//! - [`config`]: data model, per-project cache, user-global store

// Public modules
pub mod cli;
pub mod collect;
pub mod config;
pub mod deploy;
pub mod detect;
pub mod fs;
pub mod generate;

// Re-export key types for convenient access
pub use collect::{CollectError, Collector, DialoguerPrompter, Prompter, ReviewAction};
pub use config::{CollectedConfig, GlobalConfig, GlobalStore, JsonGlobalStore, StoreError};
pub use detect::{Archetype, DetectError, DetectionResult, Detector, Language};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use generate::{GenerateError, GeneratedFile, Generator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
