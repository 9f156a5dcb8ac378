use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use crate::diagnostics::SourceLocation;
use crate::errors::NoActiveStepContext;

use super::StepInfo;

pub(crate) const SOURCE_FILE: &str = file!();

tokio::task_local! {
    static CURRENT_STEP: StepContext;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Handle to the step currently executing. Clones share one step.
#[derive(Debug, Clone)]
pub struct StepContext {
    inner: Arc<StepState>,
}

#[derive(Debug)]
struct StepState {
    id: u64,
    parent: Option<u64>,
    title: String,
    location: Option<SourceLocation>,
    attachments: Mutex<Vec<Attachment>>,
}

impl StepContext {
    pub fn new(id: u64, parent: Option<u64>, info: &StepInfo) -> Self {
        Self {
            inner: Arc::new(StepState {
                id,
                parent,
                title: info.title.clone(),
                location: info.location.clone(),
                attachments: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The step running in the current task.
    pub fn current() -> Result<StepContext, NoActiveStepContext> {
        CURRENT_STEP.try_with(Clone::clone).map_err(|_| NoActiveStepContext)
    }

    pub fn try_current() -> Option<StepContext> {
        Self::current().ok()
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn parent(&self) -> Option<u64> {
        self.inner.parent
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.inner.location.as_ref()
    }

    pub fn attach(
        &self,
        name: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) {
        let attachment = Attachment {
            name: name.into(),
            content_type: content_type.into(),
            body: body.into(),
        };
        tracing::debug!(step = self.inner.id, name = %attachment.name, "attachment added");
        self.inner
            .attachments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(attachment);
    }

    pub fn attachments(&self) -> Vec<Attachment> {
        self.inner
            .attachments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Run `future` with `ctx` as the current step of this task. The context is
/// gone once the future completes, fails, panics or is dropped.
pub async fn scope<F: Future>(ctx: StepContext, future: F) -> F::Output {
    CURRENT_STEP.scope(ctx, future).await
}
