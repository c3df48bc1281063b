//! Isolator boundary error types

use thiserror::Error;

/// Errors rejected at the engine boundary, before any processing runs
#[derive(Error, Debug)]
pub enum IsolatorError {
    /// Host offered a bus layout other than stereo in / stereo out
    #[error("Unsupported bus layout: {inputs} in / {outputs} out (stereo only)")]
    UnsupportedLayout { inputs: usize, outputs: usize },

    /// Prepare called with a non-positive or non-finite sample rate
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),
}

/// Result type for isolator boundary operations
pub type IsolatorResult<T> = Result<T, IsolatorError>;
