use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::Instrument;

use super::context::StepContext;
use super::{StepInfo, StepReporter};

pub(crate) const SOURCE_FILE: &str = file!();

static NEXT_STEP_ID: AtomicU64 = AtomicU64::new(1);

/// Reports steps as `tracing` spans named `step`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl StepReporter for TracingReporter {
    fn report_step<T, B, Fut>(&self, step: StepInfo, body: B) -> impl Future<Output = T>
    where
        B: FnOnce(StepContext) -> Fut,
        Fut: Future<Output = T>,
    {
        let id = NEXT_STEP_ID.fetch_add(1, Ordering::Relaxed);
        let parent = StepContext::try_current().map(|ctx| ctx.id());
        let ctx = StepContext::new(id, parent, &step);
        let location = step
            .location
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let span = tracing::info_span!(
            "step",
            id,
            title = %step.title,
            location = %location,
        );

        async move {
            let started = Instant::now();
            tracing::info!(owner = %step.owner, member = %step.member, "step started");
            let output = body(ctx).await;
            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "step finished"
            );
            output
        }
        .instrument(span)
    }
}
