use thiserror::Error;

/// Errors surfaced by the walk engine.
///
/// `Config` is a user error in the supplied configuration and aborts the
/// affected simulation before any steps execute. `DimensionMismatch` is a
/// contract violation inside the engine: coordinates of different
/// dimensionality must never meet in arithmetic.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("step index {index} out of range for a trajectory of {len} entries")]
    StepOutOfRange { index: usize, len: usize },
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::Config(msg.into())
    }
}
