//! The `Processor` trait — the contract every field processor must fulfil.

use crate::ProcessorError;
use crate::state::WizardState;

/// The core processor trait.
///
/// A processor is bound to exactly one field ("the field it refreshes") and is
/// invoked whenever an upstream field changes. It receives the full shared
/// state and mutates it in place — typically by recomputing the one field it
/// owns from whatever other fields it chooses to read.
///
/// Processors run synchronously; one that blocks (e.g. on an inference call)
/// blocks the whole propagation pass.
pub trait Processor: Send + Sync {
    /// Recompute this processor's field from `state`, writing the result back
    /// into `state`.
    fn refresh(&self, state: &mut WizardState) -> Result<(), ProcessorError>;
}

/// Adapter that lets a plain closure act as a [`Processor`].
///
/// Defined here (in the processors crate) so both the engine and individual
/// processor implementations can use it without a circular dependency.
pub struct FnProcessor<F>(pub F);

impl<F> Processor for FnProcessor<F>
where
    F: Fn(&mut WizardState) -> Result<(), ProcessorError> + Send + Sync,
{
    fn refresh(&self, state: &mut WizardState) -> Result<(), ProcessorError> {
        (self.0)(state)
    }
}
