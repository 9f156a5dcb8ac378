mod argument_error;
mod context_error;
mod format_error;

pub use argument_error::ArgumentError;
pub use context_error::NoActiveStepContext;
pub use format_error::FormatError;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type returned by wrapped step calls.
#[derive(Debug, Error, Diagnostic)]
pub enum StepmarkError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Context(#[from] NoActiveStepContext),
}
