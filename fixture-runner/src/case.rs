use serde::Deserialize;
use stepmark::SourceLocation;

/// One YAML fixture. The `kind` key selects the operation under test.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Case {
    Format(FormatCase),
    Locate(LocateCase),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatCase {
    pub template: String,
    #[serde(default)]
    pub params: Option<Vec<String>>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    #[serde(default)]
    pub expect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocateCase {
    pub trace: String,
    #[serde(default)]
    pub skip: usize,
    /// Replaces the default ignore list when present.
    #[serde(default)]
    pub ignore: Option<Vec<String>>,
    /// `null` or absent means no location is expected.
    #[serde(default)]
    pub expect: Option<SourceLocation>,
}

impl Case {
    /// The `kind` key this case was written with.
    pub fn kind(&self) -> &'static str {
        match self {
            Case::Format(_) => "format",
            Case::Locate(_) => "locate",
        }
    }
}

pub fn parse_case(source: &str) -> Result<Case, serde_yaml::Error> {
    serde_yaml::from_str(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_case() {
        let source = r#"
kind: format
template: "A: {{a}}"
params: [a]
args: [42]
expect: "A: 42"
"#;
        let Case::Format(case) = parse_case(source).unwrap() else {
            panic!("expected a format case");
        };
        assert_eq!(case.template, "A: {{a}}");
        assert_eq!(case.params, Some(vec!["a".to_string()]));
        assert_eq!(case.args, vec![serde_json::json!(42)]);
        assert_eq!(case.expect.as_deref(), Some("A: 42"));
        assert!(case.error.is_none());
    }

    #[test]
    fn error_format_case() {
        let source = r#"
kind: format
template: "{{b}}"
signature: "fn f(a: u8)"
error: MissingParameter
mentions: [b]
"#;
        let Case::Format(case) = parse_case(source).unwrap() else {
            panic!("expected a format case");
        };
        assert_eq!(case.signature.as_deref(), Some("fn f(a: u8)"));
        assert_eq!(case.error.as_deref(), Some("MissingParameter"));
        assert_eq!(case.mentions, vec!["b"]);
    }

    #[test]
    fn locate_case() {
        let source = r#"
kind: locate
trace: |
  Error
      at login (/app/tests/login.spec.ts:10:5)
skip: 1
expect: { file: /app/tests/login.spec.ts, line: 10, column: 5 }
"#;
        let Case::Locate(case) = parse_case(source).unwrap() else {
            panic!("expected a locate case");
        };
        assert_eq!(case.skip, 1);
        assert!(case.ignore.is_none());
        let expected = case.expect.unwrap();
        assert_eq!(expected.line, 10);
        assert_eq!(expected.column, 5);
    }

    #[test]
    fn locate_case_without_location() {
        let source = "kind: locate\ntrace: \"Error\"\nexpect: null\n";
        let Case::Locate(case) = parse_case(source).unwrap() else {
            panic!("expected a locate case");
        };
        assert!(case.expect.is_none());
    }

    #[test]
    fn kind_names_match_the_yaml_tag() {
        assert_eq!(parse_case("kind: locate\ntrace: x\n").unwrap().kind(), "locate");
        assert_eq!(parse_case("kind: format\ntemplate: x\n").unwrap().kind(), "format");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse_case("kind: compile\n").is_err());
    }
}
