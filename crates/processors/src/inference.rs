//! The inference-service seam.
//!
//! Processors that auto-fill fields never talk to a model API directly; they
//! go through [`InferenceClient`], which the surrounding application
//! implements against whatever provider it uses. Retry/backoff policy lives
//! here at the client seam — the engine itself never retries.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system prompt ("You are a labour-market analyst.").
    pub system: Option<String>,
    /// The user prompt.
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.2,
            max_tokens: 40,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Errors returned by an inference client.
///
/// The retry wrapper uses the variant to decide behaviour:
/// - `Transient` — the request is retried with exponential back-off.
/// - `Permanent` — no retry is attempted.
#[derive(Debug, Error, Clone)]
pub enum InferenceError {
    /// Connection trouble, rate limiting, and the like.
    #[error("transient inference error: {0}")]
    Transient(String),

    /// The request itself is unservable (bad credentials, refused prompt).
    #[error("permanent inference error: {0}")]
    Permanent(String),
}

/// The client contract consumed by processors.
///
/// `complete` blocks until the service answers; callers that need a timeout
/// enforce it inside their implementation.
pub trait InferenceClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError>;
}

// ---------------------------------------------------------------------------
// Retry wrapper
// ---------------------------------------------------------------------------

/// Tuning knobs for [`Retrying`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of times a transient failure will be retried.
    pub max_retries: u32,
    /// Base delay for exponential back-off between retries.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Decorator that retries transient failures of an inner client.
pub struct Retrying<C> {
    inner: C,
    config: RetryConfig,
}

impl<C: InferenceClient> Retrying<C> {
    pub fn new(inner: C, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn with_defaults(inner: C) -> Self {
        Self::new(inner, RetryConfig::default())
    }
}

impl<C: InferenceClient> InferenceClient for Retrying<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError> {
        let mut attempts = 0u32;

        loop {
            match self.inner.complete(request) {
                Ok(answer) => return Ok(answer),

                Err(err @ InferenceError::Permanent(_)) => return Err(err),

                Err(err @ InferenceError::Transient(_)) => {
                    attempts += 1;
                    if attempts > self.config.max_retries {
                        return Err(err);
                    }

                    let delay = self.config.base_delay * 2u32.pow(attempts.saturating_sub(1));

                    warn!(
                        "transient inference error (attempt {}/{}), retrying in {:?}: {}",
                        attempts, self.config.max_retries, delay, err
                    );

                    thread::sleep(delay);
                }
            }
        }
    }
}
