use serde::Serialize;

use super::Value;
use crate::errors::ArgumentError;

/// Argument list of one wrapped call, viewed as template values.
///
/// Tuples of serializable values are the usual shape: `(user, "secret")`
/// exposes `[[0]]` and `[[1]]` to the template.
pub trait Arguments {
    fn to_values(&self) -> Result<Vec<Value>, ArgumentError>;
}

impl Arguments for () {
    fn to_values(&self) -> Result<Vec<Value>, ArgumentError> {
        Ok(Vec::new())
    }
}

impl Arguments for Vec<Value> {
    fn to_values(&self) -> Result<Vec<Value>, ArgumentError> {
        Ok(self.clone())
    }
}

impl Arguments for [Value] {
    fn to_values(&self) -> Result<Vec<Value>, ArgumentError> {
        Ok(self.to_vec())
    }
}

impl<T: Arguments + ?Sized> Arguments for &T {
    fn to_values(&self) -> Result<Vec<Value>, ArgumentError> {
        (**self).to_values()
    }
}

fn convert<T: Serialize + ?Sized>(index: usize, value: &T) -> Result<Value, ArgumentError> {
    Value::from_serialize(value).map_err(|err| ArgumentError::new(index, err))
}

macro_rules! impl_arguments_for_tuple {
    ($(($($name:ident : $idx:tt),+)),+ $(,)?) => {
        $(
            impl<$($name: Serialize),+> Arguments for ($($name,)+) {
                fn to_values(&self) -> Result<Vec<Value>, ArgumentError> {
                    Ok(vec![$(convert($idx, &self.$idx)?),+])
                }
            }
        )+
    };
}

impl_arguments_for_tuple!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
    (A: 0, B: 1, C: 2, D: 3, E: 4),
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5),
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6),
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct User {
        name: String,
    }

    #[test]
    fn tuples_keep_declaration_order() {
        let user = User {
            name: "Bob".into(),
        };
        let values = (&user, 7, "x").to_values().expect("serializable");
        assert_eq!(values.len(), 3);
        assert_eq!(values[0].get("name"), Some(Value::from("Bob")));
        assert_eq!(values[1], Value::Number(7.0));
        assert_eq!(values[2], Value::from("x"));
    }

    #[test]
    fn unit_has_no_arguments() {
        assert!(().to_values().expect("empty").is_empty());
    }
}
