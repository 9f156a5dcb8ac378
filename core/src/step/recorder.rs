use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::diagnostics::SourceLocation;

use super::context::{Attachment, StepContext};
use super::{StepInfo, StepReporter};

pub(crate) const SOURCE_FILE: &str = file!();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Running,
    Finished,
    /// The body panicked or was dropped before completing.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStep {
    pub id: u64,
    pub parent: Option<u64>,
    pub title: String,
    pub location: Option<SourceLocation>,
    pub owner: String,
    pub member: String,
    pub status: StepStatus,
    pub attachments: Vec<Attachment>,
}

/// In-memory reporter. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    steps: Arc<Mutex<Vec<RecordedStep>>>,
    next_id: Arc<AtomicU64>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every step reported so far, in start order.
    pub fn steps(&self) -> Vec<RecordedStep> {
        self.lock().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.lock().iter().map(|s| s.title.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedStep>> {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, ctx: &StepContext, status: StepStatus) {
        let mut steps = self.lock();
        if let Some(step) = steps.iter_mut().find(|s| s.id == ctx.id()) {
            step.status = status;
            step.attachments = ctx.attachments();
        }
    }
}

impl StepReporter for Recorder {
    fn report_step<T, B, Fut>(&self, step: StepInfo, body: B) -> impl Future<Output = T>
    where
        B: FnOnce(StepContext) -> Fut,
        Fut: Future<Output = T>,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let parent = StepContext::try_current().map(|ctx| ctx.id());
        let ctx = StepContext::new(id, parent, &step);

        self.lock().push(RecordedStep {
            id,
            parent,
            title: step.title,
            location: step.location,
            owner: step.owner,
            member: step.member,
            status: StepStatus::Running,
            attachments: Vec::new(),
        });

        let mut guard = StepGuard {
            recorder: self.clone(),
            ctx: ctx.clone(),
            done: false,
        };
        async move {
            let output = body(ctx).await;
            guard.complete();
            output
        }
    }
}

// Marks the step interrupted if the body never completes.
struct StepGuard {
    recorder: Recorder,
    ctx: StepContext,
    done: bool,
}

impl StepGuard {
    fn complete(&mut self) {
        self.done = true;
        self.recorder.finish(&self.ctx, StepStatus::Finished);
    }
}

impl Drop for StepGuard {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!(step = self.ctx.id(), "step interrupted");
            self.recorder.finish(&self.ctx, StepStatus::Interrupted);
        }
    }
}
