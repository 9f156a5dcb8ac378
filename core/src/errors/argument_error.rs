use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("argument {index} cannot be converted into a value: {source}")]
#[diagnostic(code(stepmark::argument))]
pub struct ArgumentError {
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

impl ArgumentError {
    pub fn new(index: usize, source: serde_json::Error) -> Self {
        Self { index, source }
    }
}
