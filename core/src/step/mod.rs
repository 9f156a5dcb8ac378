//! Step reporting: the reporter seam, the task-scoped step context and the
//! wrapper that ties descriptions and call sites to an operation.

pub(crate) mod context;
pub(crate) mod recorder;
pub(crate) mod tracing_reporter;
pub(crate) mod wrap;

pub use context::{Attachment, StepContext, scope};
pub use recorder::{RecordedStep, Recorder, StepStatus};
pub use tracing_reporter::TracingReporter;
pub use wrap::{StepDescriptor, Wrapped};

use std::future::Future;

use crate::diagnostics::SourceLocation;

/// What a reporter learns about a step before running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    pub title: String,
    pub location: Option<SourceLocation>,
    pub owner: String,
    pub member: String,
}

/// The host framework's step API.
///
/// An implementation records the step, creates its [`StepContext`] and runs
/// `body` with it exactly once, returning the body's output unchanged.
pub trait StepReporter {
    fn report_step<T, B, Fut>(&self, step: StepInfo, body: B) -> impl Future<Output = T>
    where
        B: FnOnce(StepContext) -> Fut,
        Fut: Future<Output = T>;
}

impl<R: StepReporter> StepReporter for &R {
    fn report_step<T, B, Fut>(&self, step: StepInfo, body: B) -> impl Future<Output = T>
    where
        B: FnOnce(StepContext) -> Fut,
        Fut: Future<Output = T>,
    {
        (**self).report_step(step, body)
    }
}

impl<R: StepReporter> StepReporter for std::sync::Arc<R> {
    fn report_step<T, B, Fut>(&self, step: StepInfo, body: B) -> impl Future<Output = T>
    where
        B: FnOnce(StepContext) -> Fut,
        Fut: Future<Output = T>,
    {
        (**self).report_step(step, body)
    }
}
