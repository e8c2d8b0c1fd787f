//! Engine-level error types.

use processors::ProcessorError;
use thiserror::Error;

/// Errors produced by the trigger engine (graph construction + propagation).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Registering this dependency would make the graph cyclic.
    #[error("dependency '{from}' -> '{to}' would create a cycle")]
    CycleDetected { from: String, to: String },

    /// A processor failed during propagation (abort policy only).
    #[error("processor for field '{field}' failed: {source}")]
    ProcessorFailed {
        field: String,
        #[source]
        source: ProcessorError,
    },

    /// A dependency catalog could not be parsed.
    #[error("invalid dependency catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}
