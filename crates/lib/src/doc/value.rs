//! Helpers over [`serde_json::Value`], the leaf type stored in documents.

use serde_json::Value;

/// Truthiness of a stored value.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy; everything else, including
/// empty arrays and objects, is truthy.
///
/// ```
/// # use persona::doc::is_truthy;
/// # use serde_json::json;
/// assert!(is_truthy(&json!("token")));
/// assert!(is_truthy(&json!({})));
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!(null)));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Short name of a value's JSON kind, used in error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
