// Interactive configuration collection
//
// A linear sequence of collection states ends in a review loop that can
// re-enter the project, server, and domain states before confirming.
// All terminal interaction goes through the Prompter trait so the whole
// flow is drivable from tests.

mod collector;
mod prompter;

pub use collector::{CollectError, Collector, ReviewAction};
pub use prompter::{Answer, DialoguerPrompter, Prompter, ScriptedPrompter};
