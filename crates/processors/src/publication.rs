//! Publication-channel processor.
//!
//! Sets `desired_publication_channels` from the remote/onsite pattern. A
//! value the user already chose is never overwritten.

use crate::state::WizardState;
use crate::{Processor, ProcessorError};

/// Field owned by this processor.
pub const PUBLICATION_CHANNELS: &str = "desired_publication_channels";

const REMOTE_BOARDS: &str = "LinkedIn Remote; WeWorkRemotely; Remote-OK";
const HYBRID_BOARDS: &str = "LinkedIn; StepStone; HybridJobs";
const ONSITE_BOARDS: &str = "LinkedIn; Indeed; StepStone";

/// Picks job boards from `remote_work_policy`.
#[derive(Debug, Default)]
pub struct PublicationChannelsProcessor;

impl PublicationChannelsProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for PublicationChannelsProcessor {
    fn refresh(&self, state: &mut WizardState) -> Result<(), ProcessorError> {
        if state.is_filled(PUBLICATION_CHANNELS) {
            return Ok(());
        }

        let policy = state
            .get_str("remote_work_policy")
            .unwrap_or_default()
            .to_lowercase();

        let boards = if policy.contains("full") && policy.contains("remote") {
            REMOTE_BOARDS
        } else if policy.contains("hybrid") {
            HYBRID_BOARDS
        } else {
            ONSITE_BOARDS
        };

        state.set(PUBLICATION_CHANNELS, boards);
        Ok(())
    }
}
