use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
#[error("no step context is active")]
#[diagnostic(
    code(stepmark::no_active_step_context),
    help("StepContext::current() only works inside a wrapped step")
)]
pub struct NoActiveStepContext;
