use rustyline::completion::Pair;

use super::COMMANDS;
use crate::session::Session;

pub fn complete_line(session: &Session, line: &str, pos: usize) -> (usize, Vec<Pair>) {
    let safe_pos = pos.min(line.len());
    let prefix = &line[..safe_pos];

    if prefix.starts_with('.') && !prefix.contains(char::is_whitespace) {
        let words = COMMANDS
            .iter()
            .copied()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| (cmd.to_string(), cmd.to_string()))
            .collect::<Vec<_>>();
        return (0, pairs(words));
    }

    if let Some((start, needle)) = open_placeholder(prefix) {
        let words = session
            .params
            .iter()
            .filter(|name| name.starts_with(needle))
            .map(|name| (name.to_string(), format!("{name}}}}}")))
            .collect::<Vec<_>>();
        return (start, pairs(words));
    }

    (safe_pos, Vec::new())
}

/// Start offset and typed text of a `{{` placeholder still open at the end
/// of `prefix`. Dotted paths are not completed.
fn open_placeholder(prefix: &str) -> Option<(usize, &str)> {
    let open = prefix.rfind("{{")?;
    let start = open + 2;
    let needle = &prefix[start..];
    if needle.contains("}}") || needle.contains('.') {
        return None;
    }
    Some((start, needle))
}

fn pairs(values: Vec<(String, String)>) -> Vec<Pair> {
    values
        .into_iter()
        .map(|(display, replacement)| Pair {
            display,
            replacement,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark::ParameterNames;

    fn session() -> Session {
        Session::new(ParameterNames::new(["user", "url", "count"]), Vec::new())
    }

    #[test]
    fn completes_parameter_names_inside_braces() {
        let (start, pairs) = complete_line(&session(), "Open {{u", 8);
        assert_eq!(start, 7);
        let replacements: Vec<_> = pairs.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(replacements, vec!["user}}", "url}}"]);
    }

    #[test]
    fn completes_commands() {
        let (start, pairs) = complete_line(&session(), ".s", 2);
        assert_eq!(start, 0);
        let names: Vec<_> = pairs.iter().map(|p| p.display.as_str()).collect();
        assert_eq!(names, vec![".signature", ".show"]);
    }

    #[test]
    fn closed_placeholders_are_not_completed() {
        let (_, pairs) = complete_line(&session(), "{{user}} x", 10);
        assert!(pairs.is_empty());
    }
}
