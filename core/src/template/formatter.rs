use std::ops::Range;

use miette::SourceSpan;

use super::{ParameterNames, Placeholder, Template};
use crate::errors::FormatError;
use crate::value::Value;

pub(super) fn render(
    template: &Template,
    params: &ParameterNames,
    args: &[Value],
) -> Result<String, FormatError> {
    if !template.has_placeholders() {
        return Ok(template.source().to_string());
    }

    validate_roots(template, params)?;

    let mut replacements: Vec<(Range<usize>, String)> =
        Vec::with_capacity(template.placeholders().len());
    for placeholder in template.placeholders() {
        let value = resolve(template, placeholder, params, args)?;
        replacements.push((placeholder.span(), value.to_description_string()));
    }

    Ok(splice(template.source(), replacements))
}

fn validate_roots(template: &Template, params: &ParameterNames) -> Result<(), FormatError> {
    let mut missing: Vec<String> = Vec::new();
    let mut spans: Vec<SourceSpan> = Vec::new();

    for placeholder in template.placeholders() {
        let Some(root) = placeholder.root() else {
            continue;
        };
        if params.contains(root) {
            continue;
        }
        spans.push(placeholder.source_span());
        if !missing.iter().any(|name| name == root) {
            missing.push(root.to_string());
        }
    }

    if missing.is_empty() {
        return Ok(());
    }
    Err(FormatError::missing_parameter(
        template.source(),
        missing,
        spans,
        params.as_slice(),
    ))
}

fn resolve(
    template: &Template,
    placeholder: &Placeholder,
    params: &ParameterNames,
    args: &[Value],
) -> Result<Value, FormatError> {
    match placeholder {
        Placeholder::Positional { index, .. } => {
            args.get(*index)
                .cloned()
                .ok_or_else(|| FormatError::IndexOutOfBounds {
                    index: *index,
                    written: written_index(template.source(), placeholder.span()),
                    count: args.len(),
                    template: template.source().to_string(),
                    span: placeholder.source_span(),
                })
        }
        Placeholder::Named { path, .. } => {
            let Some((root, segments)) = path.split_first() else {
                return Ok(Value::Undefined);
            };
            let mut current = params
                .position(root)
                .and_then(|idx| args.get(idx))
                .cloned()
                .unwrap_or(Value::Undefined);

            for segment in segments {
                current = current
                    .get(segment)
                    .ok_or_else(|| FormatError::MissingProperty {
                        segment: segment.clone(),
                        root: root.clone(),
                        template: template.source().to_string(),
                        span: placeholder.source_span(),
                    })?;
            }
            Ok(current)
        }
    }
}

// `[[digits]]` minus its brackets.
fn written_index(source: &str, span: Range<usize>) -> String {
    source
        .get(span.start + 2..span.end - 2)
        .unwrap_or_default()
        .to_string()
}

fn splice(source: &str, mut replacements: Vec<(Range<usize>, String)>) -> String {
    replacements.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (span, text) in replacements {
        out.push_str(&source[cursor..span.start]);
        out.push_str(&text);
        cursor = span.end;
    }
    out.push_str(&source[cursor..]);
    out
}
