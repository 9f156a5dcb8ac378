use std::borrow::Cow;

use owo_colors::OwoColorize;
use stepmark::{Placeholder, Template};

use crate::session::Session;

/// Colour placeholders: resolvable ones cyan/yellow, unknown or out of range
/// ones red. Command lines are coloured as a whole.
pub fn highlight_line<'l>(session: &Session, line: &'l str) -> Cow<'l, str> {
    if line.trim_start().starts_with('.') {
        return Cow::Owned(line.blue().bold().to_string());
    }

    let template = Template::parse(line);
    if !template.has_placeholders() {
        return Cow::Borrowed(line);
    }

    let mut placeholders: Vec<&Placeholder> = template.placeholders().iter().collect();
    placeholders.sort_by_key(|p| p.span().start);

    let mut out = String::with_capacity(line.len() * 2);
    let mut cursor = 0;
    for placeholder in placeholders {
        let span = placeholder.span();
        out.push_str(&line[cursor..span.start]);
        let text = &line[span.clone()];
        let styled = match placeholder {
            Placeholder::Named { .. } if known_root(session, placeholder) => {
                text.cyan().to_string()
            }
            Placeholder::Positional { index, .. } if *index < session.args.len() => {
                text.yellow().to_string()
            }
            _ => text.red().underline().to_string(),
        };
        out.push_str(&styled);
        cursor = span.end;
    }
    out.push_str(&line[cursor..]);
    Cow::Owned(out)
}

fn known_root(session: &Session, placeholder: &Placeholder) -> bool {
    placeholder
        .root()
        .is_some_and(|root| session.params.contains(root))
}

pub fn highlight_prompt(prompt: &str) -> Cow<'_, str> {
    if prompt == "> " {
        return Cow::Owned(format!("{} ", ">".bright_green().bold()));
    }
    Cow::Borrowed(prompt)
}

pub fn highlight_hint(hint: &str) -> Cow<'_, str> {
    Cow::Owned(hint.bright_black().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark::{ParameterNames, Value};

    #[test]
    fn plain_text_is_borrowed() {
        let session = Session::default();
        assert!(matches!(highlight_line(&session, "hello"), Cow::Borrowed("hello")));
    }

    #[test]
    fn placeholders_keep_their_text() {
        let session = Session::new(ParameterNames::new(["a"]), vec![Value::Null]);
        let out = highlight_line(&session, "x {{a}} [[0]] {{b}} y");
        assert!(out.contains("{{a}}"));
        assert!(out.contains("[[0]]"));
        assert!(out.contains("{{b}}"));
        assert!(out.starts_with("x "));
        assert!(out.ends_with(" y"));
    }
}
