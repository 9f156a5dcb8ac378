mod arguments;
mod coercion;
mod convert;
mod display;

pub use arguments::Arguments;

use std::collections::BTreeMap;

/// Dynamic value of one call argument, as seen by description templates.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A declared parameter that received no argument.
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Look up one dotted-path segment on this value.
    ///
    /// Objects answer by key, arrays by decimal index, and arrays and strings
    /// both answer `length`. Anything else is not indexable.
    pub fn get(&self, segment: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(segment).cloned(),
            Value::Array(items) => {
                if segment == "length" {
                    return Some(Value::Number(items.len() as f64));
                }
                segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| items.get(idx))
                    .cloned()
            }
            Value::String(s) if segment == "length" => {
                Some(Value::Number(s.chars().count() as f64))
            }
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
