//! Recorded action to workflow step synthesis.

pub mod action;
pub mod generalizer;
pub mod identifiers;
pub mod session;
pub mod strategies;
pub mod target_text;

pub use action::ActionKind;
pub use generalizer::{Generalization, generalize_identifier, is_dynamic_identifier};
pub use session::{RecordingSession, SessionState, StepSynthesizer};
pub use strategies::{
    DEFAULT_FUZZY_THRESHOLD, generate_strategies, generate_strategies_with_threshold, infer_role,
    sort_by_priority, summarize,
};
pub use target_text::{ExtractionInput, extract_target_text};
