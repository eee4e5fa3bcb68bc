// Configuration data model and persistence
//
// Two stores exist: a user-global registry of server profiles and project
// history under the home directory, and a per-project cache holding the
// last confirmed configuration. Both are whole-file JSON, read-then-
// overwritten; this tool runs as a single interactive foreground session.

mod cache;
mod model;
mod store;

pub use cache::{load_cached_config, save_cached_config, CACHE_FILE};
pub use model::{
    is_valid_project_name, BranchSettings, CollectedConfig, ConfigViolation, DomainSettings,
    ProjectSettings, ServerProfile, ServerSettings,
};
pub use store::{
    GlobalConfig, GlobalStore, InMemoryGlobalStore, JsonGlobalStore, ProjectRecord, StoreError,
};
