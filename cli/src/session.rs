use stepmark::{FormatError, ParameterNames, Template, Value};

/// Parameter names and argument values templates are rendered against.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub params: ParameterNames,
    pub args: Vec<Value>,
}

impl Session {
    pub fn new(params: ParameterNames, args: Vec<Value>) -> Self {
        Self { params, args }
    }

    pub fn render(&self, template: &str) -> Result<String, FormatError> {
        Template::parse(template).render(&self.params, &self.args)
    }

    pub fn describe(&self) -> String {
        let params = self.params.iter().collect::<Vec<_>>().join(", ");
        let args = self
            .args
            .iter()
            .map(|v| v.to_json().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("params: [{params}]\nargs:   [{args}]")
    }
}

/// One `--arg` value: JSON when it parses, a plain string otherwise.
pub fn parse_arg(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Whitespace-separated JSON values, e.g. `1 "two" {"three": 3}`. Falls back
/// to plain whitespace-separated strings when the line is not all JSON.
pub fn parse_arg_list(raw: &str) -> Vec<Value> {
    let parsed: Result<Vec<serde_json::Value>, _> = serde_json::Deserializer::from_str(raw)
        .into_iter::<serde_json::Value>()
        .collect();
    match parsed {
        Ok(values) => values.into_iter().map(Value::from).collect(),
        Err(_) => raw.split_whitespace().map(parse_arg).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_fall_back_to_strings() {
        assert_eq!(parse_arg("42"), Value::Number(42.0));
        assert_eq!(parse_arg("\"quoted\""), Value::from("quoted"));
        assert_eq!(parse_arg("Bob"), Value::from("Bob"));
    }

    #[test]
    fn arg_list_accepts_json_with_spaces() {
        let values = parse_arg_list(r#"1 "two words" {"name": "Bob"}"#);
        assert_eq!(values.len(), 3);
        assert_eq!(values[1], Value::from("two words"));
        assert_eq!(values[2].get("name"), Some(Value::from("Bob")));
    }

    #[test]
    fn arg_list_of_bare_words() {
        let values = parse_arg_list("Bob 7");
        assert_eq!(values, vec![Value::from("Bob"), Value::Number(7.0)]);
    }

    #[test]
    fn session_renders_templates() {
        let session = Session::new(
            ParameterNames::new(["name"]),
            vec![Value::from("Bob"), Value::Number(77.0)],
        );
        assert_eq!(
            session.render("Named: {{name}}, Index: [[1]]").expect("resolvable"),
            "Named: Bob, Index: 77"
        );
    }
}
