use super::dialect::Dialect;
use serde_json::Value;

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a schema `default` as a SQL literal
///
/// Strings are single-quoted with `'` doubled, booleans become `1`/`0` unless
/// the dialect has a native boolean, arrays and objects are JSON-serialised
/// text.
pub fn format_default(value: &Value, dialect: &Dialect) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => {
            let literal = match (*b, dialect.has_native_boolean()) {
                (true, true) => "TRUE",
                (false, true) => "FALSE",
                (true, false) => "1",
                (false, false) => "0",
            };
            literal.to_string()
        }
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_text(s),
        Value::Array(_) | Value::Object(_) => quote_text(&value.to_string()),
    }
}

/// Render an `example` value for the seed INSERT
///
/// Arrays and objects are JSON-serialised; every other value is quoted as
/// text. `null` stays `NULL`.
pub fn format_example(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quote_text(s),
        other => quote_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_literals() {
        let lite = Dialect::Sqlite;
        assert_eq!(format_default(&json!("it's"), &lite), "'it''s'");
        assert_eq!(format_default(&json!(true), &lite), "1");
        assert_eq!(format_default(&json!(false), &lite), "0");
        assert_eq!(format_default(&json!(true), &Dialect::Postgres), "TRUE");
        assert_eq!(format_default(&json!(2.5), &lite), "2.5");
        assert_eq!(format_default(&json!(null), &lite), "NULL");
        assert_eq!(format_default(&json!(["a", "b"]), &lite), r#"'["a","b"]'"#);
        assert_eq!(format_default(&json!({"k": "v's"}), &lite), r#"'{"k":"v''s"}'"#);
    }

    #[test]
    fn test_example_literals() {
        assert_eq!(format_example(&json!("O'Brien")), "'O''Brien'");
        assert_eq!(format_example(&json!(42)), "'42'");
        assert_eq!(format_example(&json!(true)), "'true'");
        assert_eq!(format_example(&json!({"a": 1})), r#"'{"a":1}'"#);
        assert_eq!(format_example(&json!(null)), "NULL");
    }
}
