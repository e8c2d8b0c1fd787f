//! `processors` crate — the `Processor` trait, the shared wizard state, and
//! the built-in field processors.
//!
//! Every processor — built-in and application-supplied alike — must implement
//! [`Processor`]. The engine crate dispatches propagation through this trait
//! object.

pub mod error;
pub mod inference;
pub mod mock;
pub mod publication;
pub mod salary;
pub mod state;
pub mod traits;

pub use error::ProcessorError;
pub use inference::{CompletionRequest, InferenceClient, InferenceError};
pub use publication::PublicationChannelsProcessor;
pub use salary::SalaryRangeProcessor;
pub use state::WizardState;
pub use traits::{FnProcessor, Processor};
