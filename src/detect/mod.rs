// Static project inspection
//
// The detector classifies a project directory by its marker files and
// file contents, without touching the network or executing anything.
// Results seed the interactive configuration flow.

mod archetype;
mod detector;
mod env_file;
mod port;
mod types;

pub use archetype::{Archetype, ArchetypeDefaults, Language};
pub use detector::{DetectError, Detector};
pub use types::DetectionResult;
