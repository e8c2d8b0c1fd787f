//! Session-level change dispatch.
//!
//! The wizard UI re-renders its whole state on every interaction; the engine
//! must only hear about fields whose value actually differs from the previous
//! render. `WizardSession` owns that diffing: it keeps the last-seen snapshot,
//! computes the changed keys, and fires `notify_change` once per changed key.
//!
//! One session object per user session, passed explicitly — no ambient
//! global.

use tracing::{debug, instrument};
use uuid::Uuid;

use processors::WizardState;

use crate::engine::{PropagationReport, TriggerEngine};
use crate::EngineError;

/// Keys with this prefix are wizard internals and never trigger propagation.
const INTERNAL_PREFIX: char = '_';

/// A per-session wrapper that diffs wizard state between renders and drives
/// the trigger engine for every changed field.
pub struct WizardSession {
    id: Uuid,
    engine: TriggerEngine,
    snapshot: WizardState,
}

impl WizardSession {
    pub fn new(engine: TriggerEngine) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine,
            snapshot: WizardState::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn engine(&self) -> &TriggerEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TriggerEngine {
        &mut self.engine
    }

    /// Seed `state` so every graph field exists as a key (empty string), the
    /// way the wizard initialises a fresh session.
    pub fn seed_state(&self, state: &mut WizardState) {
        let fields: Vec<String> = self.engine.graph().nodes().map(str::to_owned).collect();
        state.ensure_keys(fields.iter().map(String::as_str));
    }

    /// Diff `state` against the previous snapshot and propagate every changed
    /// field, in sorted key order, then store a fresh snapshot.
    ///
    /// Keys prefixed with `_` are internal and ignored. Returns one report
    /// per changed field that was propagated.
    ///
    /// # Errors
    /// The first propagation error aborts the dispatch; the snapshot is *not*
    /// updated in that case, so the failed fields are re-detected as changed
    /// on the next dispatch.
    #[instrument(skip(self, state), fields(session = %self.id))]
    pub fn dispatch(
        &mut self,
        state: &mut WizardState,
    ) -> Result<Vec<PropagationReport>, EngineError> {
        let changed: Vec<String> = state
            .iter()
            .filter(|(key, _)| !key.starts_with(INTERNAL_PREFIX))
            .filter(|(key, value)| self.snapshot.get(key) != Some(value))
            .map(|(key, _)| key.clone())
            .collect();

        debug!("detected {} changed field(s): {:?}", changed.len(), changed);

        let mut reports = Vec::with_capacity(changed.len());
        for key in &changed {
            reports.push(self.engine.notify_change(key, state)?);
        }

        self.snapshot = state.clone();
        Ok(reports)
    }
}
