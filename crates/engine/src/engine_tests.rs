//! Engine-level propagation tests.
//!
//! These exercise the full path — graph, propagation order, processor
//! registry, failure policy — with mock processors, so no inference service
//! is required. Graph-only unit tests live next to the graph code.

use std::sync::Arc;

use processors::mock::{CannedClient, MockProcessor};
use processors::{InferenceClient, Processor, SalaryRangeProcessor, WizardState};

use crate::engine::{EngineConfig, FailurePolicy, TriggerEngine};
use crate::EngineError;

/// Engine with edges `task_list → salary_range` and
/// `must_have_skills → salary_range`.
fn salary_engine() -> TriggerEngine {
    let mut engine = TriggerEngine::new();
    engine
        .register_dependencies([
            ("task_list", "salary_range"),
            ("must_have_skills", "salary_range"),
        ])
        .unwrap();
    engine
}

// ============================================================
// Core propagation contract
// ============================================================

#[test]
fn unknown_field_is_a_noop() {
    let mut engine = salary_engine();
    let probe = Arc::new(MockProcessor::recording("probe"));
    engine.register_processor("salary_range", Arc::clone(&probe) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    state.set("favourite_colour", "green");
    let before = state.clone();

    let report = engine.notify_change("favourite_colour", &mut state).unwrap();

    assert!(report.refreshed.is_empty());
    assert_eq!(state, before);
    assert_eq!(probe.call_count(), 0);
}

#[test]
fn propagation_reaches_transitive_descendants() {
    // a → b → c, no direct a → c edge.
    let mut engine = TriggerEngine::new();
    engine.register_dependencies([("a", "b"), ("b", "c")]).unwrap();

    let c_processor = Arc::new(MockProcessor::writing("c", "c", "refreshed"));
    engine.register_processor("c", Arc::clone(&c_processor) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    engine.notify_change("a", &mut state).unwrap();

    assert_eq!(c_processor.call_count(), 1);
    assert_eq!(state.get_str("c"), Some("refreshed"));
}

#[test]
fn changed_field_never_triggers_its_own_processor() {
    let mut engine = salary_engine();

    let own = Arc::new(MockProcessor::recording("task_list"));
    engine.register_processor("task_list", Arc::clone(&own) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    engine.notify_change("task_list", &mut state).unwrap();

    assert_eq!(own.call_count(), 0);
}

#[test]
fn later_processor_registration_replaces_the_earlier_one() {
    let mut engine = salary_engine();

    let first = Arc::new(MockProcessor::writing("first", "salary_range", "from-first"));
    let second = Arc::new(MockProcessor::writing("second", "salary_range", "from-second"));
    engine.register_processor("salary_range", Arc::clone(&first) as Arc<dyn Processor>);
    engine.register_processor("salary_range", Arc::clone(&second) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    engine.notify_change("task_list", &mut state).unwrap();

    assert_eq!(first.call_count(), 0);
    assert_eq!(second.call_count(), 1);
    assert_eq!(state.get_str("salary_range"), Some("from-second"));
}

#[test]
fn isolated_field_affects_nothing() {
    let mut engine = salary_engine();
    engine.register_node("loner");

    let probe = Arc::new(MockProcessor::recording("probe"));
    engine.register_processor("salary_range", Arc::clone(&probe) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    let report = engine.notify_change("loner", &mut state).unwrap();

    assert!(report.refreshed.is_empty());
    assert_eq!(probe.call_count(), 0);
}

#[test]
fn missing_processor_is_skipped_silently() {
    let mut engine = salary_engine();

    let mut state = WizardState::new();
    let report = engine.notify_change("task_list", &mut state).unwrap();

    // salary_range is affected but has no processor registered.
    assert!(report.refreshed.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn processor_on_a_field_outside_the_graph_is_never_invoked() {
    let mut engine = salary_engine();

    let orphan = Arc::new(MockProcessor::recording("orphan"));
    engine.register_processor("not_in_graph", Arc::clone(&orphan) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    engine.notify_change("task_list", &mut state).unwrap();

    assert_eq!(orphan.call_count(), 0);
}

// ============================================================
// Ordering
// ============================================================

#[test]
fn sibling_processors_each_run_exactly_once() {
    // team_structure → reports_to, team_structure → supervises
    let mut engine = TriggerEngine::new();
    engine
        .register_dependencies([
            ("team_structure", "reports_to"),
            ("team_structure", "supervises"),
        ])
        .unwrap();

    let reports_to = Arc::new(MockProcessor::writing("r", "reports_to", "CTO"));
    let supervises = Arc::new(MockProcessor::writing("s", "supervises", "2 juniors"));
    // Registration order is the reverse of the invocation order.
    engine.register_processor("supervises", Arc::clone(&supervises) as Arc<dyn Processor>);
    engine.register_processor("reports_to", Arc::clone(&reports_to) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    let report = engine.notify_change("team_structure", &mut state).unwrap();

    assert_eq!(reports_to.call_count(), 1);
    assert_eq!(supervises.call_count(), 1);
    assert_eq!(report.refreshed, vec!["reports_to", "supervises"]);
}

#[test]
fn downstream_processor_sees_upstream_refresh() {
    // industry_experience → task_list → salary_range: the salary processor
    // must observe the task list its upstream processor just wrote.
    let mut engine = TriggerEngine::new();
    engine
        .register_dependencies([
            ("industry_experience", "task_list"),
            ("task_list", "salary_range"),
        ])
        .unwrap();

    engine.register_processor_fn("task_list", |state| {
        state.set("task_list", "suggested tasks");
        Ok(())
    });

    let salary = Arc::new(MockProcessor::recording("salary"));
    engine.register_processor("salary_range", Arc::clone(&salary) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    let report = engine.notify_change("industry_experience", &mut state).unwrap();

    assert_eq!(report.refreshed, vec!["task_list", "salary_range"]);
    let seen = salary.call_log();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].get_str("task_list"), Some("suggested tasks"));
}

// ============================================================
// Failure policy
// ============================================================

#[test]
fn abort_policy_stops_at_the_first_failure() {
    let mut engine = TriggerEngine::new();
    engine
        .register_dependencies([("root", "boom"), ("boom", "never")])
        .unwrap();

    let boom = Arc::new(MockProcessor::failing("boom", "something broke"));
    let never = Arc::new(MockProcessor::recording("never"));
    engine.register_processor("boom", Arc::clone(&boom) as Arc<dyn Processor>);
    engine.register_processor("never", Arc::clone(&never) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    let result = engine.notify_change("root", &mut state);

    assert!(matches!(
        result,
        Err(EngineError::ProcessorFailed { ref field, .. }) if field == "boom"
    ));
    assert_eq!(never.call_count(), 0);
}

#[test]
fn continue_policy_refreshes_the_rest_and_reports_failures() {
    let mut engine = TriggerEngine::with_config(EngineConfig {
        failure_policy: FailurePolicy::Continue,
    });
    engine
        .register_dependencies([("root", "boom"), ("boom", "after")])
        .unwrap();

    let boom = Arc::new(MockProcessor::failing("boom", "something broke"));
    let after = Arc::new(MockProcessor::writing("after", "after", "ok"));
    engine.register_processor("boom", Arc::clone(&boom) as Arc<dyn Processor>);
    engine.register_processor("after", Arc::clone(&after) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    let report = engine.notify_change("root", &mut state).unwrap();

    assert_eq!(report.refreshed, vec!["after"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].field, "boom");
    assert_eq!(after.call_count(), 1);
}

#[test]
fn state_keeps_mutations_made_before_an_abort() {
    let mut engine = TriggerEngine::new();
    engine
        .register_dependencies([("root", "alpha_ok"), ("alpha_ok", "boom")])
        .unwrap();

    let ok = Arc::new(MockProcessor::writing("ok", "alpha_ok", "done"));
    let boom = Arc::new(MockProcessor::failing("boom", "nope"));
    engine.register_processor("alpha_ok", Arc::clone(&ok) as Arc<dyn Processor>);
    engine.register_processor("boom", Arc::clone(&boom) as Arc<dyn Processor>);

    let mut state = WizardState::new();
    let result = engine.notify_change("root", &mut state);

    assert!(result.is_err());
    assert_eq!(state.get_str("alpha_ok"), Some("done"));
}

// ============================================================
// Wizard scenarios with the shipped salary processor
// ============================================================

fn engine_with_salary_processor(client: Arc<dyn InferenceClient>) -> TriggerEngine {
    let mut engine = salary_engine();
    engine.register_processor("salary_range", Arc::new(SalaryRangeProcessor::new(client)));
    engine
}

#[test]
fn empty_salary_range_is_computed_on_task_change() {
    let client = Arc::new(CannedClient::returning("55 000 - 65 000 EUR"));
    let engine = engine_with_salary_processor(client);

    let mut state = WizardState::new();
    state.set("task_list", "new tasks");
    state.set("salary_range", "");

    engine.notify_change("task_list", &mut state).unwrap();

    assert_eq!(state.get_str("salary_range"), Some("55 000 - 65 000 EUR"));
}

#[test]
fn manual_salary_range_survives_task_change() {
    let client = Arc::new(CannedClient::returning("should not be used"));
    let engine = engine_with_salary_processor(client);

    let mut state = WizardState::new();
    state.set("task_list", "new tasks");
    state.set("salary_range", "50000-60000");

    engine.notify_change("task_list", &mut state).unwrap();

    assert_eq!(state.get_str("salary_range"), Some("50000-60000"));
}
