pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod errors;
pub mod step;
pub mod template;
pub mod value;

pub use config::{EngineConfig, LocationStrategy};
pub use diagnostics::{Locator, SourceLocation, StackTrace};
pub use engine::Engine;
pub use errors::{ArgumentError, FormatError, NoActiveStepContext, StepmarkError};
pub use step::{
    Attachment, RecordedStep, Recorder, StepContext, StepDescriptor, StepInfo, StepReporter,
    StepStatus, TracingReporter, Wrapped,
};
pub use template::{ParameterNames, Placeholder, Template};
pub use value::{Arguments, Value};

/// Substitute the placeholders of `template` with `arguments`.
pub fn format<S: AsRef<str>>(
    template: &str,
    parameter_names: &[S],
    arguments: &[Value],
) -> Result<String, FormatError> {
    let params = ParameterNames::new(parameter_names.iter().map(|s| s.as_ref()));
    Template::parse(template).render(&params, arguments)
}

/// Locate the caller in `stack_trace` with the default ignore list, after
/// skipping `own_frame_depth` leading frames.
pub fn locate(stack_trace: &str, own_frame_depth: usize) -> Option<SourceLocation> {
    Locator::new()
        .with_own_frame_depth(own_frame_depth)
        .locate(stack_trace)
}
