//! Description templates.
//!
//! A template is plain text with two kinds of placeholders:
//!
//! * named, `{{identifier}}` or `{{identifier.path.to.field}}`, resolved
//!   against the declared parameter names of the wrapped operation;
//! * positional, `[[index]]`, resolved against the raw argument list.
//!
//! There is no escaping for literal `{{` or `[[`.

mod formatter;
mod params;

pub use params::ParameterNames;

use std::ops::Range;

use miette::SourceSpan;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::FormatError;
use crate::value::Value;

static NAMED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]*)\}\}").expect("named placeholder pattern"));
static POSITIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(\d+)\]\]").expect("positional placeholder pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Named { path: Vec<String>, span: Range<usize> },
    Positional { index: usize, span: Range<usize> },
}

impl Placeholder {
    /// Byte range of the whole placeholder, delimiters included.
    pub fn span(&self) -> Range<usize> {
        match self {
            Placeholder::Named { span, .. } | Placeholder::Positional { span, .. } => span.clone(),
        }
    }

    /// Parameter name a named placeholder resolves from.
    pub fn root(&self) -> Option<&str> {
        match self {
            Placeholder::Named { path, .. } => path.first().map(String::as_str),
            Placeholder::Positional { .. } => None,
        }
    }

    pub(crate) fn source_span(&self) -> SourceSpan {
        let span = self.span();
        (span.start, span.end - span.start).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    placeholders: Vec<Placeholder>,
}

impl Template {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let placeholders = extract(&source);
        Self {
            source,
            placeholders,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholders in discovery order: named first, then positional.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    pub fn render(&self, params: &ParameterNames, args: &[Value]) -> Result<String, FormatError> {
        formatter::render(self, params, args)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Template::parse(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Template::parse(source)
    }
}

fn extract(source: &str) -> Vec<Placeholder> {
    let mut placeholders: Vec<Placeholder> = NAMED
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?.as_str();
            Some(Placeholder::Named {
                path: inner.split('.').map(str::to_string).collect(),
                span: whole.range(),
            })
        })
        .collect();

    let named_spans: Vec<Range<usize>> = placeholders.iter().map(Placeholder::span).collect();
    let overlaps_named =
        |span: &Range<usize>| named_spans.iter().any(|n| n.start < span.end && span.start < n.end);

    placeholders.extend(POSITIONAL.captures_iter(source).filter_map(|caps| {
        let whole = caps.get(0)?;
        if overlaps_named(&whole.range()) {
            return None;
        }
        // Digits only; an index too large for usize is out of bounds anyway.
        let index = caps[1].parse::<usize>().unwrap_or(usize::MAX);
        Some(Placeholder::Positional {
            index,
            span: whole.range(),
        })
    }));

    placeholders
}
