//! Request parameter validation and form-urlencoded body construction.
//!
//! The service reads its parameters the way a PHP `http_build_query` body is
//! laid out: nested mappings become `key[sub]=value`, sequences become
//! `key[0]=value`, booleans are sent as `1`/`0` and `null` entries are left
//! out entirely.

use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use super::error::ApiError;

/// Parameter mapping sent with a conversion request.
pub type FormParams = Map<String, Value>;

/// Serializes caller parameters and checks they form a key/value mapping.
///
/// # Errors
///
/// Returns [`ApiError::InvalidParams`] when the value serializes to anything
/// other than an object (a scalar, a sequence or `null`), or cannot be
/// serialized at all.
pub fn to_form_params<P: Serialize + ?Sized>(params: &P) -> Result<FormParams, ApiError> {
    let value = serde_json::to_value(params)
        .map_err(|e| ApiError::invalid_params(format!("parameters cannot be serialized: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::invalid_params(format!(
            "expected a key/value mapping, got {}",
            kind_name(&other)
        ))),
    }
}

/// Flattens parameters into ordered `(key, value)` pairs.
#[must_use]
pub fn flatten(params: &FormParams) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        push_value(&mut pairs, key.clone(), value);
    }
    pairs
}

/// Encodes parameters as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn encode(params: &FormParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in flatten(params) {
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_value(pairs, format!("{key}[{index}]"), item);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                push_value(pairs, format!("{key}[{sub}]"), item);
            }
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
