//! The canonical wizard dependency catalog.
//!
//! Pure configuration: the `(source, dependent)` field pairs the wizard ships
//! with, loaded into an engine at session start. No algorithmic weight.

use std::sync::Arc;

use processors::{InferenceClient, PublicationChannelsProcessor, SalaryRangeProcessor};

use crate::{EngineError, TriggerEngine};

/// The default field-dependency pairs (edge `source → dependent`).
pub const DEFAULT_DEPENDENCIES: &[(&str, &str)] = &[
    // Tasks → salary range (supply/demand complexity)
    ("task_list", "salary_range"),
    // Must-have skills → salary range
    ("must_have_skills", "salary_range"),
    // Remote policy → publication channels
    ("remote_work_policy", "desired_publication_channels"),
    // Role keywords → SEO keyword set
    ("role_keywords", "seo_keywords"),
    // Industry experience → task suggestions
    ("industry_experience", "task_list"),
    // Team structure → reports-to and supervises
    ("team_structure", "reports_to"),
    ("team_structure", "supervises"),
    // Tool proficiency → technical tasks
    ("tool_proficiency", "technical_tasks"),
    // Parsed raw document → salary range
    ("parsed_data_raw", "salary_range"),
    // Soft skills → interview questions
    ("soft_skills", "interview_questions"),
    // Language requirements → translation-required flag
    ("language_requirements", "translation_required"),
    // Company/candidate distance → relocation assistance
    ("company_location_distance", "relocation_assistance"),
];

/// Populate `engine` with the canonical wizard dependency graph.
pub fn build_default_graph(engine: &mut TriggerEngine) -> Result<(), EngineError> {
    engine.register_dependencies(DEFAULT_DEPENDENCIES.iter().copied())
}

/// Attach the shipped processors: salary range (via `client`) and
/// publication channels.
pub fn register_default_processors(engine: &mut TriggerEngine, client: Arc<dyn InferenceClient>) {
    engine.register_processor(
        processors::salary::SALARY_RANGE,
        Arc::new(SalaryRangeProcessor::new(client)),
    );
    engine.register_processor(
        processors::publication::PUBLICATION_CHANNELS,
        Arc::new(PublicationChannelsProcessor::new()),
    );
}

/// Parse a catalog from a JSON list of `[source, dependent]` pairs.
///
/// # Errors
/// [`EngineError::InvalidCatalog`] when the JSON does not parse as a pair
/// list.
pub fn parse_catalog(text: &str) -> Result<Vec<(String, String)>, EngineError> {
    Ok(serde_json::from_str(text)?)
}
