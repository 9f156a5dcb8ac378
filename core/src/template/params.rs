/// Declared parameter names of a wrapped operation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterNames {
    names: Vec<String>,
}

impl ParameterNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive names from signature text such as
    /// `fn login(&self, user: &User, password: &str) -> bool` or
    /// `login(user, password)`.
    ///
    /// Takes the text between the first `(` and its matching `)`, splits on
    /// top-level commas, drops receivers and type annotations. Destructuring
    /// patterns and default values are not understood and come through as
    /// written.
    pub fn from_signature(signature: &str) -> Self {
        let Some(list) = parameter_list(signature) else {
            return Self::default();
        };
        let names = split_top_level(list, ',')
            .into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty() && !is_receiver(entry))
            .map(|entry| {
                let name = split_top_level(entry, ':')
                    .first()
                    .copied()
                    .unwrap_or(entry)
                    .trim();
                name.strip_prefix("mut ").unwrap_or(name).trim().to_string()
            })
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ParameterNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn parameter_list(signature: &str) -> Option<&str> {
    let open = signature.find('(')?;
    let mut depth = 0usize;
    for (idx, ch) in signature[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&signature[open + 1..open + idx]);
                }
            }
            _ => {}
        }
    }
    // Unbalanced: take everything after the opening paren.
    Some(&signature[open + 1..])
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut prev = '\0';

    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '>' if prev != '-' && prev != '=' => depth -= 1,
            ':' if separator == ':' && depth == 0 && is_path_separator(text, idx, prev) => {}
            c if c == separator && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
        prev = ch;
    }
    parts.push(&text[start..]);
    parts
}

// `a::b` is a path, not a type annotation.
fn is_path_separator(text: &str, idx: usize, prev: char) -> bool {
    prev == ':' || text[idx + 1..].starts_with(':')
}

fn is_receiver(entry: &str) -> bool {
    let mut rest = entry.trim_start_matches('&').trim_start();
    if rest.starts_with('\'') {
        rest = rest
            .split_once(char::is_whitespace)
            .map_or("", |(_, tail)| tail.trim_start());
    }
    let rest = rest.strip_prefix("mut ").unwrap_or(rest).trim_start();
    rest == "self" || rest.starts_with("self:") || rest.starts_with("self ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(signature: &str) -> Vec<String> {
        ParameterNames::from_signature(signature).as_slice().to_vec()
    }

    #[test]
    fn plain_list() {
        assert_eq!(names("login(user, password)"), vec!["user", "password"]);
    }

    #[test]
    fn rust_signature_with_receiver_and_types() {
        assert_eq!(
            names("fn login(&mut self, user: &User, mut retries: u32) -> bool"),
            vec!["user", "retries"]
        );
    }

    #[test]
    fn generics_and_closures_do_not_split() {
        assert_eq!(
            names("fn run(map: HashMap<String, u8>, f: impl Fn(u8, u8) -> u8, items: &[(i32, i32)])"),
            vec!["map", "f", "items"]
        );
    }

    #[test]
    fn lifetime_receiver_and_trailing_comma() {
        assert_eq!(names("fn go(&'a self, target: std::path::PathBuf,)"), vec!["target"]);
    }

    #[test]
    fn no_parens_means_no_parameters() {
        assert!(names("login").is_empty());
        assert!(names("fn ping()").is_empty());
    }
}
