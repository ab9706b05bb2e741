//! Flattens structured values into URL-encoded query strings.
//!
//! Nested maps and lists are written with bracket-path keys:
//!
//! ```text
//! {a: [1, 2]}            a[]=1&a[]=2
//! {a: [{x: 1}, {x: 2}]}  a[0][x]=1&a[1][x]=2
//! {a: {b: "c"}}          a[b]=c
//! ```
//!
//! Container elements of a list get their numeric index; scalar elements get
//! an empty bracket. Once a key already ends in `[]`, list elements are
//! emitted as-is without descending further.
//!
//! Keys and values are URI-component encoded (space becomes `%20`), except
//! that the square brackets of a key path stay literal.

use crate::error::Error;
use crate::value::{FormField, RequestData, Scalar, Value};

/// Serialize request data into a query string (no leading `?`).
pub fn serialize_data(data: &RequestData) -> Result<String, Error> {
    match data {
        RequestData::Query(raw) => {
            if raw.is_empty() {
                return Err(missing_data());
            }
            Ok(raw.clone())
        }
        RequestData::Fields(fields) => Ok(serialize_fields(fields)),
        RequestData::Value(value) => serialize(value),
    }
}

/// Serialize a structured value into a query string.
///
/// A string scalar is taken to be an already-encoded query string and returned
/// unchanged. A top-level list is read as a list of `{name, value}` form
/// fields. Absent or falsy input is rejected.
pub fn serialize(input: &Value) -> Result<String, Error> {
    if !input.is_truthy() {
        return Err(missing_data());
    }

    let mut out = QueryString::default();
    match input {
        Value::Scalar(Scalar::String(raw)) => return Ok(raw.clone()),
        Value::List(items) => {
            for item in items {
                let name = item.get("name").map(Value::resolve).unwrap_or(Scalar::Null);
                let value = item.get("value").cloned().unwrap_or_else(Value::null);
                out.emit(&name.to_string(), &value);
            }
        }
        Value::Map(entries) => {
            for (key, value) in entries {
                build_params(key, value, &mut out);
            }
        }
        // Truthy scalars and getters have no keys to visit.
        Value::Scalar(_) | Value::Deferred(_) => {}
    }
    Ok(out.finish())
}

/// Serialize a flat form-field list.
pub fn serialize_fields(fields: &[FormField]) -> String {
    let mut out = QueryString::default();
    for field in fields {
        out.push(&field.name, &field.value);
    }
    out.finish()
}

fn build_params(prefix: &str, value: &Value, out: &mut QueryString) {
    match value {
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if prefix.ends_with("[]") {
                    out.emit(prefix, item);
                } else {
                    let index = if item.is_container() { i.to_string() } else { String::new() };
                    build_params(&format!("{prefix}[{index}]"), item, out);
                }
            }
        }
        Value::Map(entries) => {
            for (key, child) in entries {
                build_params(&format!("{prefix}[{key}]"), child, out);
            }
        }
        Value::Scalar(_) | Value::Deferred(_) => out.emit(prefix, value),
    }
}

/// Encode every segment of a bracket path, leaving `[` and `]` in place.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(pos) = rest.find(['[', ']']) {
        encoded.push_str(&urlencoding::encode(&rest[..pos]));
        encoded.push_str(&rest[pos..pos + 1]);
        rest = &rest[pos + 1..];
    }
    encoded.push_str(&urlencoding::encode(rest));
    encoded
}

fn missing_data() -> Error {
    Error::invalid("serialize must be called on data")
}

#[derive(Default)]
struct QueryString {
    pairs: Vec<String>,
}

impl QueryString {
    fn emit(&mut self, key: &str, value: &Value) {
        self.push(key, &value.resolve());
    }

    fn push(&mut self, key: &str, value: &Scalar) {
        let key = encode_key(key);
        let value = urlencoding::encode(&value.to_string()).into_owned();
        self.pairs.push(format!("{}={value}", key.trim()));
    }

    fn finish(self) -> String {
        self.pairs.join("&")
    }
}
