//! The trigger engine — a dependency graph bound to a processor registry.
//!
//! `TriggerEngine` is the propagation coordinator:
//! 1. Looks up every field transitively affected by a change.
//! 2. Orders them topologically (lexicographic tie-break) so each processor
//!    sees its upstream affected fields already refreshed.
//! 3. Invokes each affected field's processor — if one is registered —
//!    against the shared wizard state.
//!
//! The engine is stateless per call: it owns the graph and the registry, never
//! the state. One engine lives per user session and is passed explicitly to
//! whoever needs to notify it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use processors::{FnProcessor, Processor, ProcessorError, WizardState};

use crate::EngineError;
use crate::graph::DependencyGraph;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What `notify_change` does when a processor fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the propagation pass at the first failure.
    #[default]
    Abort,
    /// Keep refreshing the remaining fields and collect the failures in the
    /// report.
    Continue,
}

/// Tuning knobs for the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub failure_policy: FailurePolicy,
}

// ---------------------------------------------------------------------------
// Outcome of a propagation pass
// ---------------------------------------------------------------------------

/// A processor failure recorded under [`FailurePolicy::Continue`].
#[derive(Debug)]
pub struct FieldFailure {
    pub field: String,
    pub error: ProcessorError,
}

/// The result of one `notify_change` call.
#[derive(Debug, Default)]
pub struct PropagationReport {
    /// The field whose change started the pass.
    pub changed_field: String,
    /// Fields whose processor ran successfully, in invocation order.
    pub refreshed: Vec<String>,
    /// Failures collected under [`FailurePolicy::Continue`]; always empty
    /// under `Abort`.
    pub failures: Vec<FieldFailure>,
}

impl PropagationReport {
    fn new(changed_field: &str) -> Self {
        Self {
            changed_field: changed_field.to_owned(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// TriggerEngine
// ---------------------------------------------------------------------------

/// DAG of field dependencies plus a processor registry.
pub struct TriggerEngine {
    graph: DependencyGraph,
    processors: HashMap<String, Arc<dyn Processor>>,
    config: EngineConfig,
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            graph: DependencyGraph::new(),
            processors: HashMap::new(),
            config,
        }
    }

    /// The owned dependency graph.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    // ------------------------------------------------------------------ graph

    /// Idempotently ensure `name` exists as a graph node.
    pub fn register_node(&mut self, name: impl Into<String>) {
        self.graph.register_node(name);
    }

    /// Declare that `target` depends on `source`.
    ///
    /// # Errors
    /// [`EngineError::CycleDetected`] if the edge would make the graph cyclic.
    pub fn register_dependency(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.graph.register_dependency(source, target)
    }

    /// Register a batch of `(source, target)` pairs in order.
    pub fn register_dependencies<S, T>(
        &mut self,
        pairs: impl IntoIterator<Item = (S, T)>,
    ) -> Result<(), EngineError>
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.graph.register_dependencies(pairs)
    }

    // ---------------------------------------------------------- processors API

    /// Attach the processor that refreshes `field`, replacing any previous
    /// one (last registration wins).
    ///
    /// `field` need not be a graph node; a processor on an unregistered field
    /// is simply never invoked.
    pub fn register_processor(&mut self, field: impl Into<String>, processor: Arc<dyn Processor>) {
        let field = field.into();
        if self.processors.insert(field.clone(), processor).is_some() {
            debug!("processor for '{field}' replaced");
        }
    }

    /// Convenience: register a closure as the processor for `field`.
    pub fn register_processor_fn<F>(&mut self, field: impl Into<String>, f: F)
    where
        F: Fn(&mut WizardState) -> Result<(), ProcessorError> + Send + Sync + 'static,
    {
        self.register_processor(field, Arc::new(FnProcessor(f)));
    }

    // -------------------------------------------------------------- run-time

    /// Propagate a change of `changed_field` through the dependency graph.
    ///
    /// Every field transitively dependent on `changed_field` is visited in
    /// topological order (lexicographic tie-break); a visited field's
    /// processor — if one is registered — runs exactly once against `state`.
    /// The changed field's own processor is never invoked, and a field the
    /// graph does not know makes the whole call a no-op.
    ///
    /// # Errors
    /// [`EngineError::ProcessorFailed`] when a processor fails under
    /// [`FailurePolicy::Abort`]; `state` keeps all mutations made up to that
    /// point.
    #[instrument(skip(self, state), fields(field = changed_field))]
    pub fn notify_change(
        &self,
        changed_field: &str,
        state: &mut WizardState,
    ) -> Result<PropagationReport, EngineError> {
        let mut report = PropagationReport::new(changed_field);

        if !self.graph.contains(changed_field) {
            debug!("field is not a graph node, nothing depends on it");
            return Ok(report);
        }

        let order = self.graph.propagation_order(changed_field);
        info!("propagating to {} affected field(s): {:?}", order.len(), order);

        for field in order {
            let Some(processor) = self.processors.get(&field) else {
                debug!("no processor registered for '{field}', skipping");
                continue;
            };

            match processor.refresh(state) {
                Ok(()) => {
                    debug!("field '{field}' refreshed");
                    report.refreshed.push(field);
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(EngineError::ProcessorFailed { field, source: error });
                    }
                    FailurePolicy::Continue => {
                        warn!("processor for '{field}' failed, continuing: {error}");
                        report.failures.push(FieldFailure { field, error });
                    }
                },
            }
        }

        Ok(report)
    }
}
