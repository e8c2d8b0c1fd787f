//! `engine` crate — the field-dependency graph, the trigger engine, the
//! default dependency catalog, and session-level change dispatch.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod graph;
pub mod session;

pub use catalog::{build_default_graph, register_default_processors, DEFAULT_DEPENDENCIES};
pub use engine::{EngineConfig, FailurePolicy, PropagationReport, TriggerEngine};
pub use error::EngineError;
pub use graph::DependencyGraph;
pub use session::WizardSession;

#[cfg(test)]
mod engine_tests;
