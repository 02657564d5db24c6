pub mod config;
pub mod resolution;
pub mod synthesis;
pub mod variables;

pub use wayfind_common::protocol;
pub use wayfind_common::workflow;

pub use resolution::{ElementResolver, NotFoundReason, Resolution};
pub use synthesis::{RecordingSession, StepSynthesizer, extract_target_text, generate_strategies};
pub use config::{ConfigLoader, WayfindConfig};
pub use variables::apply_markers;
