// Deployment artifact generation
//
// Deterministic template substitution: a finalized configuration in, a
// fixed set of files out. Existing files are backed up with a `.backup`
// suffix before being overwritten; there is no merging.

mod generator;
mod templates;

pub use generator::{GenerateError, GeneratedFile, Generator, INIT_SCRIPT_PATH};
pub use templates::TemplateCategory;
