//! Test doubles — a mock processor and a canned inference client.
//!
//! Useful in unit and integration tests where a real processor or a live
//! inference service is either unavailable or irrelevant.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::inference::{CompletionRequest, InferenceClient, InferenceError};
use crate::state::WizardState;
use crate::{Processor, ProcessorError};

// ---------------------------------------------------------------------------
// MockProcessor
// ---------------------------------------------------------------------------

/// Behaviour injected into `MockProcessor` at construction time.
pub enum MockBehaviour {
    /// Write a specific value into the state under the given key.
    WriteValue { key: String, value: Value },
    /// Fail with a `ProcessorError::Failed`.
    Fail(String),
    /// Do nothing (observe-only).
    Noop,
}

/// A mock processor that records every state it receives and performs a
/// programmer-specified action.
pub struct MockProcessor {
    /// Label used in test assertions.
    pub name: String,
    /// What the processor will do when `refresh` is called.
    pub behaviour: MockBehaviour,
    /// Snapshot of the state at each call (in call order).
    pub calls: Arc<Mutex<Vec<WizardState>>>,
}

impl MockProcessor {
    /// Create a mock that writes `value` under `key` on every call.
    pub fn writing(
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            behaviour: MockBehaviour::WriteValue {
                key: key.into(),
                value: value.into(),
            },
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails.
    pub fn failing(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviour: MockBehaviour::Fail(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that only records its invocations.
    pub fn recording(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviour: MockBehaviour::Noop,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times this processor has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Shared handle to the call log, for assertions after the processor has
    /// been moved into an engine registry.
    pub fn call_log(&self) -> Arc<Mutex<Vec<WizardState>>> {
        Arc::clone(&self.calls)
    }
}

impl Processor for MockProcessor {
    fn refresh(&self, state: &mut WizardState) -> Result<(), ProcessorError> {
        self.calls.lock().unwrap().push(state.clone());

        match &self.behaviour {
            MockBehaviour::WriteValue { key, value } => {
                state.set(key.clone(), value.clone());
                Ok(())
            }
            MockBehaviour::Fail(msg) => Err(ProcessorError::Failed(msg.clone())),
            MockBehaviour::Noop => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// CannedClient
// ---------------------------------------------------------------------------

/// An in-memory [`InferenceClient`] that replays scripted responses.
///
/// Once the script runs out, every further call returns the fallback result.
pub struct CannedClient {
    script: Mutex<VecDeque<Result<String, InferenceError>>>,
    fallback: Result<String, InferenceError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CannedClient {
    /// A client that always succeeds with the given answer.
    pub fn returning(answer: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(answer.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client that always fails with a transient error.
    pub fn failing_transient(msg: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(InferenceError::Transient(msg.into())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client that always fails with a permanent error.
    pub fn failing_permanent(msg: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(InferenceError::Permanent(msg.into())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client that replays `script` in order, then fails transiently.
    pub fn scripted(script: Vec<Result<String, InferenceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Err(InferenceError::Transient("script exhausted".into())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of completion requests seen so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The prompt of the most recent request, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
    }
}

impl InferenceClient for CannedClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => self.fallback.clone(),
        }
    }
}
