use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use stepmark::step::{StepInfo, scope};
use stepmark::{
    Engine, LocationStrategy, NoActiveStepContext, Recorder, StepContext, StepDescriptor,
    StepStatus,
};

fn info(title: &str) -> StepInfo {
    StepInfo {
        title: title.to_string(),
        location: None,
        owner: "Owner".to_string(),
        member: "member".to_string(),
    }
}

#[test]
fn lookup_outside_any_step_fails() {
    assert_eq!(StepContext::current().unwrap_err(), NoActiveStepContext);
    assert!(StepContext::try_current().is_none());
}

#[tokio::test]
async fn scope_exposes_the_context_only_while_running() {
    let ctx = StepContext::new(7, None, &info("scoped"));

    let seen = scope(ctx.clone(), async {
        StepContext::current().map(|c| c.id())
    })
    .await;

    assert_eq!(seen, Ok(7));
    assert_eq!(StepContext::current().unwrap_err(), NoActiveStepContext);
}

#[tokio::test]
async fn context_is_cleared_after_the_operation_fails() {
    let recorder = Recorder::new();
    let wrapped = Engine::new().with_location(LocationStrategy::Disabled).wrap(
        recorder.clone(),
        StepDescriptor::new("Api", "fail"),
        |()| async { Err::<(), _>("boom") },
    );

    let out = wrapped.call(()).await.expect("static title");

    assert_eq!(out, Err("boom"));
    assert_eq!(StepContext::current().unwrap_err(), NoActiveStepContext);
}

#[tokio::test]
async fn panicking_operation_leaves_no_context_and_an_interrupted_step() {
    let recorder = Recorder::new();
    let wrapped = Engine::new().with_location(LocationStrategy::Disabled).wrap(
        recorder.clone(),
        StepDescriptor::new("Api", "explode"),
        |()| async {
            if StepContext::current().is_ok() {
                panic!("operation panicked");
            }
        },
    );

    let local = tokio::task::LocalSet::new();
    let joined = local
        .run_until(async move {
            tokio::task::spawn_local(async move { wrapped.call(()).await }).await
        })
        .await;

    assert!(joined.expect_err("task panicked").is_panic());
    assert_eq!(StepContext::current().unwrap_err(), NoActiveStepContext);
    let steps = recorder.steps();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].status, StepStatus::Interrupted);
}

#[tokio::test]
async fn dropped_step_is_interrupted() {
    let recorder = Recorder::new();
    let wrapped = Engine::new().with_location(LocationStrategy::Disabled).wrap(
        recorder.clone(),
        StepDescriptor::new("Api", "slow"),
        |()| std::future::pending::<()>(),
    );

    let pending = Box::pin(wrapped.call(()));
    let polled = poll_once(pending).await;

    assert!(!polled);
    assert_eq!(recorder.steps()[0].status, StepStatus::Interrupted);
}

// Polls a future once, then drops it. Returns whether it was ready.
async fn poll_once<F: Future + Unpin>(mut fut: F) -> bool {
    std::future::poll_fn(|cx| {
        Poll::Ready(Pin::new(&mut fut).poll(cx).is_ready())
    })
    .await
}

#[test]
fn attachments_are_shared_between_clones() {
    let ctx = StepContext::new(1, None, &info("shared"));
    let clone = ctx.clone();

    clone.attach("log.txt", "text/plain", "hello");

    let attachments = ctx.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].body, b"hello".to_vec());
    assert!(ctx.ptr_eq(&clone));
}
