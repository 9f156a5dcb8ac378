use crate::session::Session;

/// Live preview of the rendered template at the end of the line.
pub fn hint_for(session: &Session, line: &str, pos: usize) -> Option<String> {
    if pos < line.len() {
        return None;
    }

    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        return None;
    }

    match session.render(line) {
        Ok(text) if text == line => None,
        Ok(text) => Some(format!("  => {text}")),
        Err(err) => Some(format!("  !! {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark::{ParameterNames, Value};

    fn session() -> Session {
        Session::new(ParameterNames::new(["a"]), vec![Value::Number(42.0)])
    }

    #[test]
    fn previews_rendering() {
        assert_eq!(hint_for(&session(), "A: {{a}}", 8).as_deref(), Some("  => A: 42"));
    }

    #[test]
    fn previews_errors() {
        let hint = hint_for(&session(), "{{b}}", 5).expect("error hint");
        assert!(hint.starts_with("  !! "));
        assert!(hint.contains('b'));
    }

    #[test]
    fn no_hint_mid_line_or_for_plain_text() {
        assert_eq!(hint_for(&session(), "A: {{a}}", 2), None);
        assert_eq!(hint_for(&session(), "plain", 5), None);
        assert_eq!(hint_for(&session(), ".help", 5), None);
    }
}
