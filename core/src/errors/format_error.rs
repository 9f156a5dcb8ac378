use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Failure to turn a template into a step description.
#[derive(Debug, Error, Diagnostic)]
pub enum FormatError {
    #[error("template references unknown parameter(s): {}", .names.join(", "))]
    #[diagnostic(code(stepmark::missing_parameter))]
    MissingParameter {
        names: Vec<String>,

        #[source_code]
        template: String,

        #[label(collection, "not a declared parameter")]
        spans: Vec<SourceSpan>,

        #[help]
        help: Option<String>,
    },

    #[error("property '{segment}' does not exist on parameter '{root}'")]
    #[diagnostic(code(stepmark::missing_property))]
    MissingProperty {
        segment: String,
        root: String,

        #[source_code]
        template: String,

        #[label("unresolved segment")]
        span: SourceSpan,
    },

    #[error("positional index {written} is out of bounds for {count} argument(s)")]
    #[diagnostic(
        code(stepmark::index_out_of_bounds),
        help("positional placeholders are zero-based")
    )]
    IndexOutOfBounds {
        /// Saturates at `usize::MAX` for indices that do not fit.
        index: usize,
        /// The digits as they appear in the template.
        written: String,
        count: usize,

        #[source_code]
        template: String,

        #[label("out of range")]
        span: SourceSpan,
    },
}

impl FormatError {
    pub(crate) fn missing_parameter(
        template: &str,
        names: Vec<String>,
        spans: Vec<SourceSpan>,
        declared: &[String],
    ) -> Self {
        let help = if declared.is_empty() {
            "the wrapped operation declares no parameters".to_string()
        } else {
            format!("declared parameters: {}", declared.join(", "))
        };
        Self::MissingParameter {
            names,
            template: template.to_string(),
            spans,
            help: Some(help),
        }
    }

    /// Stable name of the error kind, as used by fixtures and the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            FormatError::MissingParameter { .. } => "MissingParameter",
            FormatError::MissingProperty { .. } => "MissingProperty",
            FormatError::IndexOutOfBounds { .. } => "IndexOutOfBounds",
        }
    }
}
