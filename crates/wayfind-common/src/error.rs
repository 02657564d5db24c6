use thiserror::Error;

/// Errors raised while decoding recorded traces, snapshots or workflows.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Step {index} does not exist (workflow has {len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Step {0} has no element target")]
    NoTarget(usize),
}
