use serde_json::Value;

pub const NIL: &str = "(nil)";

/// Render a decoded result for stdout.
///
/// Nil prints as `(nil)`, arrays and objects as indented JSON, and scalars
/// bare (strings without quotes).
pub fn format_result(result: &Value) -> String {
    match result {
        Value::Null => String::from(NIL),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
        }
        scalar => scalar.to_string(),
    }
}
