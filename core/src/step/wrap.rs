use std::future::Future;
use std::panic::Location;

use crate::engine::Engine;
use crate::errors::StepmarkError;
use crate::template::{ParameterNames, Template};
use crate::value::Arguments;

use super::context::scope;
use super::{StepInfo, StepReporter};

pub(crate) const SOURCE_FILE: &str = file!();

/// Static description of a wrapped operation: who owns it, what its
/// parameters are called and how its steps should be titled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    owner: String,
    member: String,
    params: ParameterNames,
    template: Option<Template>,
}

impl StepDescriptor {
    pub fn new(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
            params: ParameterNames::default(),
            template: None,
        }
    }

    pub fn with_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = ParameterNames::new(names);
        self
    }

    /// Take parameter names from signature text, see
    /// [`ParameterNames::from_signature`].
    pub fn with_signature(mut self, signature: &str) -> Self {
        self.params = ParameterNames::from_signature(signature);
        self
    }

    pub fn with_template(mut self, template: impl Into<Template>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn params(&self) -> &ParameterNames {
        &self.params
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn default_title(&self) -> String {
        format!("{}.{}", self.owner, self.member)
    }

    /// Title for one call with the given arguments.
    pub fn describe<A: Arguments + ?Sized>(&self, args: &A) -> Result<String, StepmarkError> {
        let Some(template) = &self.template else {
            return Ok(self.default_title());
        };
        let values = args.to_values()?;
        Ok(template.render(&self.params, &values)?)
    }
}

/// An operation wrapped so that every call is reported as one step.
#[derive(Debug, Clone)]
pub struct Wrapped<R, F> {
    engine: Engine,
    reporter: R,
    descriptor: StepDescriptor,
    op: F,
}

impl<R, F> Wrapped<R, F> {
    pub(crate) fn new(engine: Engine, reporter: R, descriptor: StepDescriptor, op: F) -> Self {
        Self {
            engine,
            reporter,
            descriptor,
            op,
        }
    }

    pub fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}

impl<R: StepReporter, F> Wrapped<R, F> {
    /// Report one step and run the operation inside it.
    ///
    /// The title and call site are resolved here, before the returned future
    /// is first polled. A title that cannot be formatted fails the call
    /// without reporting a step or running the operation.
    #[track_caller]
    pub fn call<A, Fut>(&self, args: A) -> impl Future<Output = Result<Fut::Output, StepmarkError>>
    where
        F: Fn(A) -> Fut,
        A: Arguments,
        Fut: Future,
    {
        let caller = Location::caller();
        let prepared = self.prepare(&args, caller);

        async move {
            let info = prepared?;
            let op = &self.op;
            let output = self
                .reporter
                .report_step(info, move |ctx| scope(ctx, async move { op(args).await }))
                .await;
            Ok(output)
        }
    }

    fn prepare<A: Arguments>(
        &self,
        args: &A,
        caller: &'static Location<'static>,
    ) -> Result<StepInfo, StepmarkError> {
        let title = self.descriptor.describe(args).inspect_err(|err| {
            tracing::debug!(
                step = %self.descriptor.default_title(),
                error = %err,
                "step title could not be formatted"
            );
        })?;
        let location = self.engine.locate_call(caller);

        tracing::debug!(%title, location = ?location, "step prepared");
        Ok(StepInfo {
            title,
            location,
            owner: self.descriptor.owner.clone(),
            member: self.descriptor.member.clone(),
        })
    }
}
