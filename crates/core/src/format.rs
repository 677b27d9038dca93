//! Formatting policy for scrollback entries.

use crate::lang::value::Value;
use crate::scrollback::EntryKind;

/// Renders the values of one entry. `echo` and `error` entries join their
/// values as-is; `return` and console entries render each value individually
/// and join the results with `", "`.
pub fn format_values(kind: EntryKind, values: &[Value]) -> String {
    let rendered: Vec<String> = match kind {
        EntryKind::Return | EntryKind::Console(_) => values.iter().map(format_value).collect(),
        EntryKind::Echo | EntryKind::Error => values.iter().map(|v| v.to_string()).collect(),
    };
    rendered.join(", ")
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        // callables render as their source text
        Value::Function { .. } | Value::Builtin(_) => value.to_string(),
        Value::Null
        | Value::Bool(_)
        | Value::Num(_)
        | Value::Str(_)
        | Value::Array(_)
        | Value::Object(_) => value
            .to_json()
            // a formatting failure must never suppress the entry
            .unwrap_or_else(|_| format!("{} {{}}", value.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::builtins::Builtin;
    use crate::scrollback::ConsoleLevel;

    #[test]
    fn test_undefined_renders_as_literal() {
        assert_eq!(
            format_values(EntryKind::Return, &[Value::Undefined]),
            "undefined"
        );
    }

    #[test]
    fn test_return_values_render_as_json() {
        let tests: Vec<(Value, &str)> = vec![
            (Value::Null, "null"),
            (Value::Bool(true), "true"),
            (Value::Num(6.0), "6"),
            (Value::Str("hi".to_string()), "\"hi\""),
            (
                Value::Array(vec![Value::Num(2.0), Value::Num(3.0)]),
                "[2,3]",
            ),
            (
                Value::Object(vec![
                    ("a".to_string(), Value::Num(1.0)),
                    (
                        "b".to_string(),
                        Value::Array(vec![Value::Num(2.0), Value::Num(3.0)]),
                    ),
                ]),
                r#"{"a":1,"b":[2,3]}"#,
            ),
        ];

        for (value, expected) in tests {
            assert_eq!(format_values(EntryKind::Return, &[value]), expected);
        }
    }

    #[test]
    fn test_console_args_join_with_comma() {
        let text = format_values(
            EntryKind::Console(ConsoleLevel::Log),
            &[Value::Str("x".to_string()), Value::Num(1.0), Value::Undefined],
        );
        assert_eq!(text, "\"x\", 1, undefined");
    }

    #[test]
    fn test_callables_render_as_source_text() {
        assert_eq!(
            format_values(EntryKind::Return, &[Value::Builtin(Builtin::Len)]),
            "fn len() { [builtin] }"
        );
    }

    #[test]
    fn test_serialization_failure_falls_back_to_type_marker() {
        // non-finite numbers cannot be carried by JSON
        assert_eq!(
            format_values(EntryKind::Return, &[Value::Num(f64::NAN)]),
            "Number {}"
        );
        // a callable nested in a structured value poisons its serialization
        let poisoned = Value::Array(vec![Value::Builtin(Builtin::Len)]);
        assert_eq!(format_values(EntryKind::Return, &[poisoned]), "Array {}");

        let poisoned = Value::Object(vec![(
            "f".to_string(),
            Value::Builtin(Builtin::TypeOf),
        )]);
        assert_eq!(format_values(EntryKind::Return, &[poisoned]), "Object {}");
    }

    #[test]
    fn test_echo_values_pass_through() {
        assert_eq!(
            format_values(EntryKind::Echo, &[Value::Str("1 + 1".to_string())]),
            "1 + 1"
        );
    }
}
