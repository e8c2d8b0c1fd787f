//! Processor-level error type.

use thiserror::Error;

use crate::inference::InferenceError;

/// Errors returned by a processor's `refresh` method.
///
/// How a failure affects the rest of a propagation pass is decided by the
/// engine's failure policy, not here.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The inference service could not produce a value.
    #[error("inference request failed: {0}")]
    Inference(#[from] InferenceError),

    /// Any other processor failure.
    #[error("{0}")]
    Failed(String),
}
