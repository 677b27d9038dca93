use std::{cell::RefCell, fmt, rc::Rc};

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::lang::{
    ast::{Block, Expr},
    builtins::Builtin,
    env::Environment,
};

/// A runtime value. The variants form the closed dispatch table the
/// formatting policy switches over.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Array(Vec<Value>),
    /// Insertion-ordered key/value pairs.
    Object(Vec<(String, Value)>),
    Function {
        parameters: Vec<String>,
        body: Block,
        environment: Rc<RefCell<Environment>>,
    },
    Builtin(Builtin),
}

impl Value {
    /// Runtime type name of the value, e.g. `Number` or `Function`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Num(_) => "Number",
            Value::Str(_) => "String",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Function { .. } | Value::Builtin(_) => "Function",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(boolean) => *boolean,
            Value::Num(num) => *num != 0.0 && !num.is_nan(),
            Value::Str(string) => !string.is_empty(),
            _ => true,
        }
    }

    /// Canonical JSON text of the value. Fails for values JSON cannot carry:
    /// non-finite numbers and nested callables.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// 2^53, the largest range in which every integer is exact in an f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(boolean) => serializer.serialize_bool(*boolean),
            Value::Num(num) => {
                if !num.is_finite() {
                    return Err(S::Error::custom("non-finite number"));
                }
                if num.fract() == 0.0 && num.abs() < MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*num as i64)
                } else {
                    serializer.serialize_f64(*num)
                }
            }
            Value::Str(string) => serializer.serialize_str(string),
            Value::Array(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Function { .. } | Value::Builtin(_) => {
                Err(S::Error::custom("function values are not serializable"))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(boolean) => write!(f, "{boolean}"),
            Value::Num(num) => {
                if num.is_nan() {
                    write!(f, "NaN")
                } else if num.is_infinite() {
                    write!(f, "{}Infinity", if *num < 0.0 { "-" } else { "" })
                } else {
                    write!(f, "{num}")
                }
            }
            Value::Str(string) => write!(f, "{string}"),
            Value::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(|el| el.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{elements}]")
            }
            Value::Object(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{{{pairs}}}")
            }
            Value::Function {
                parameters, body, ..
            } => {
                // reconstruct the source text from the stored AST
                let function = Expr::Function {
                    parameters: parameters.clone(),
                    body: body.clone(),
                };
                write!(f, "{function}")
            }
            Value::Builtin(builtin) => write!(f, "fn {}() {{ [builtin] }}", builtin.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ast::{Infix, Stmt};

    #[test]
    fn test_type_names() {
        let tests: Vec<(Value, &str)> = vec![
            (Value::Undefined, "Undefined"),
            (Value::Null, "Null"),
            (Value::Bool(true), "Boolean"),
            (Value::Num(1.5), "Number"),
            (Value::Str("x".to_string()), "String"),
            (Value::Array(vec![]), "Array"),
            (Value::Object(vec![]), "Object"),
            (Value::Builtin(Builtin::Len), "Function"),
        ];

        for (value, expected) in tests {
            assert_eq!(value.type_name(), expected);
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Num(0.0).is_truthy());
        assert!(!Value::Num(f64::NAN).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Num(-1.0).is_truthy());
        assert!(Value::Str("0".to_string()).is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(vec![]).is_truthy());
    }

    #[test]
    fn test_to_json_preserves_insertion_order() {
        let value = Value::Object(vec![
            ("b".to_string(), Value::Num(2.0)),
            ("a".to_string(), Value::Num(1.0)),
        ]);
        assert_eq!(value.to_json().unwrap(), r#"{"b":2,"a":1}"#);
    }

    #[test]
    fn test_to_json_integral_numbers() {
        assert_eq!(Value::Num(6.0).to_json().unwrap(), "6");
        assert_eq!(Value::Num(-2.0).to_json().unwrap(), "-2");
        assert_eq!(Value::Num(3.14).to_json().unwrap(), "3.14");
    }

    #[test]
    fn test_to_json_failures() {
        assert!(Value::Num(f64::NAN).to_json().is_err());
        assert!(Value::Num(f64::INFINITY).to_json().is_err());
        assert!(
            Value::Array(vec![Value::Builtin(Builtin::Len)])
                .to_json()
                .is_err()
        );
    }

    #[test]
    fn test_function_display_is_source_text() {
        let function = Value::Function {
            parameters: vec!["x".to_string()],
            body: vec![Stmt::Expression(Expr::Infix(
                Box::new(Expr::Identifier("x".to_string())),
                Infix::Multiply,
                Box::new(Expr::Num(2.0)),
            ))],
            environment: Rc::new(RefCell::new(Environment::new())),
        };
        assert_eq!(function.to_string(), "fn(x) { (x * 2) }");

        let builtin = Value::Builtin(Builtin::TypeOf);
        assert_eq!(builtin.to_string(), "fn typeof() { [builtin] }");
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Num(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Num(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Num(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Num(1.0).to_string(), "1");
    }
}
