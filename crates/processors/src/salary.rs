//! Salary-range processor.
//!
//! Recomputes `salary_range` when `task_list`, `must_have_skills`, or
//! `parsed_data_raw` change:
//! 1. A concrete manual value is kept (the `"competitive"` placeholder does
//!    not count as concrete).
//! 2. Otherwise the inference service is asked for a benchmark
//!    "min – max EUR" string.
//! 3. A transient service failure degrades to a placeholder rather than
//!    failing the propagation pass.

use std::sync::Arc;

use tracing::debug;

use crate::inference::{CompletionRequest, InferenceClient, InferenceError};
use crate::state::WizardState;
use crate::{Processor, ProcessorError};

/// Field owned by this processor.
pub const SALARY_RANGE: &str = "salary_range";

/// Manual value that still means "not decided yet".
const COMPETITIVE_PLACEHOLDER: &str = "competitive";

/// Written when the inference service is unreachable.
pub const ESTIMATION_PENDING: &str = "Auto-estimation pending";

/// Estimates a salary range from the role's tasks, skills, and location.
pub struct SalaryRangeProcessor {
    client: Arc<dyn InferenceClient>,
}

impl SalaryRangeProcessor {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    fn build_request(state: &WizardState) -> CompletionRequest {
        let prompt = format!(
            "Estimate a realistic annual salary range in EUR for the following \
             position in Germany. Answer only as \"min - max EUR\" \
             (e.g. \"55 000 - 65 000 EUR\").\n\n\
             Job title: {}\n\
             City: {}\n\
             Key tasks: {}\n\
             Must-have skills: {}\n",
            state.get_str("job_title").filter(|s| !s.is_empty()).unwrap_or("unknown"),
            state.get_str("city").filter(|s| !s.is_empty()).unwrap_or("n/a"),
            state.get_str("task_list").filter(|s| !s.is_empty()).unwrap_or("-"),
            state.get_str("must_have_skills").filter(|s| !s.is_empty()).unwrap_or("-"),
        );

        CompletionRequest::new(prompt).with_system("You are a labour-market analyst.")
    }
}

impl Processor for SalaryRangeProcessor {
    fn refresh(&self, state: &mut WizardState) -> Result<(), ProcessorError> {
        // Keep manual edits.
        if state.is_filled(SALARY_RANGE)
            && state.get_str(SALARY_RANGE) != Some(COMPETITIVE_PLACEHOLDER)
        {
            debug!("salary_range already concrete, keeping manual value");
            return Ok(());
        }

        let request = Self::build_request(state);

        match self.client.complete(&request) {
            Ok(answer) => {
                let answer = answer.trim();
                let value = if answer.is_empty() { ESTIMATION_PENDING } else { answer };
                state.set(SALARY_RANGE, value);
                Ok(())
            }
            Err(InferenceError::Transient(reason)) => {
                debug!("inference unavailable ({reason}), deferring salary estimate");
                state.set(SALARY_RANGE, ESTIMATION_PENDING);
                Ok(())
            }
            Err(err @ InferenceError::Permanent(_)) => Err(err.into()),
        }
    }
}
