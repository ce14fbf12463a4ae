//! JSON argument parsing helpers for function and trait-based tools.
//!
//! ```rust
//! use ptooling::{parse_arguments, required_string};
//!
//! let args = parse_arguments(r#"{"city":"Paris"}"#);
//! assert_eq!(required_string(&args, "city").expect("city"), "Paris");
//!
//! assert_eq!(parse_arguments(""), serde_json::json!({}));
//! assert_eq!(parse_arguments("{\"ci"), serde_json::json!({}));
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

/// Lenient parse used at dispatch: empty or malformed text becomes `{}`.
///
/// Non-object JSON values pass through unchanged.
pub fn parse_arguments(args_json: &str) -> Value {
    if args_json.trim().is_empty() {
        return Value::Object(Map::new());
    }

    match serde_json::from_str(args_json) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(arguments = args_json, error = %err, "malformed tool arguments, using empty object");
            Value::Object(Map::new())
        }
    }
}

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn required_string(args: &Value, key: &str) -> Result<String, ToolError> {
    optional_string(args, key)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn optional_string(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(ToString::to_string)
}
