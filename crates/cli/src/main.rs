//! `vacancy-wizard` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate`  — check a dependency catalog for cycles.
//! - `affected`  — print the propagation order for a changed field.
//! - `propagate` — run one propagation pass against a JSON state file.
//!
//! The `propagate` command runs fully offline: the salary processor gets a
//! stub inference client and degrades to its pending placeholder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use engine::{build_default_graph, catalog, register_default_processors, TriggerEngine};
use processors::inference::{CompletionRequest, InferenceClient, InferenceError};
use processors::WizardState;

#[derive(Parser)]
#[command(
    name = "vacancy-wizard",
    about = "Field-dependency trigger engine for the vacancy wizard",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a dependency catalog (JSON list of [source, target] pairs).
    Validate {
        /// Path to the catalog file; the built-in catalog when omitted.
        path: Option<PathBuf>,
    },
    /// Print the propagation order for a changed field.
    Affected {
        /// The changed field name.
        field: String,
        /// Catalog file to load instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Run one propagation pass against a JSON state file and print the
    /// mutated state.
    Propagate {
        /// The changed field name.
        field: String,
        /// Path to the wizard state (JSON object).
        #[arg(long)]
        state: PathBuf,
        /// Catalog file to load instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Stand-in for the external inference service; always unavailable.
struct OfflineClient;

impl InferenceClient for OfflineClient {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, InferenceError> {
        Err(InferenceError::Transient(
            "inference service not configured".into(),
        ))
    }
}

fn build_engine(catalog_path: Option<&Path>) -> anyhow::Result<TriggerEngine> {
    let mut engine = TriggerEngine::new();

    match catalog_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read catalog {}", path.display()))?;
            let pairs = catalog::parse_catalog(&text)?;
            engine.register_dependencies(pairs)?;
        }
        None => build_default_graph(&mut engine)?,
    }

    Ok(engine)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let engine = build_engine(path.as_deref())?;
            println!(
                "catalog is acyclic: {} fields, {} dependencies",
                engine.graph().node_count(),
                engine.graph().edge_count()
            );
        }

        Command::Affected { field, catalog } => {
            let engine = build_engine(catalog.as_deref())?;
            let order = engine.graph().propagation_order(&field);

            if order.is_empty() {
                println!("nothing depends on '{field}'");
            } else {
                for (i, affected) in order.iter().enumerate() {
                    println!("{}. {affected}", i + 1);
                }
            }
        }

        Command::Propagate { field, state, catalog } => {
            let mut engine = build_engine(catalog.as_deref())?;
            register_default_processors(&mut engine, Arc::new(OfflineClient));

            let text = std::fs::read_to_string(&state)
                .with_context(|| format!("cannot read state {}", state.display()))?;
            let mut wizard_state: WizardState =
                serde_json::from_str(&text).context("state file is not a JSON object")?;

            let report = engine.notify_change(&field, &mut wizard_state)?;
            info!(
                "refreshed {} field(s): {:?}",
                report.refreshed.len(),
                report.refreshed
            );

            println!("{}", serde_json::to_string_pretty(&wizard_state)?);
        }
    }

    Ok(())
}
