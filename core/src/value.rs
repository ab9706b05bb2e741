//! Data shapes accepted by the serializer and the request client.
//!
//! # Design
//! `Value` is a small dynamic tree, closer to what a form or a query string
//! carries than to a full JSON document. Maps are kept as ordered key/value
//! pairs because the serialized query string must follow insertion order;
//! `serde_json::Map` would sort its keys. `Deferred` lets a caller hand over a
//! getter instead of a materialized value; it is resolved only when the value
//! is emitted.

use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Scalar {
    /// Whether the value counts as "present" (`null`, `false`, `0` and `""` do not).
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Scalar::String(s) => !s.is_empty(),
        }
    }
}

/// Largest integer an f64 holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A float with no fractional part, within the exact-integer range, as an
/// integer. `1.0` is written `1` in query strings and JSON bodies alike.
fn whole_float(n: &serde_json::Number) -> Option<i64> {
    if !n.is_f64() {
        return None;
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER).then_some(f as i64)
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => match whole_float(n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => match whole_float(n) {
                Some(i) => serializer.serialize_i64(i),
                None => n.serialize(serializer),
            },
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Scalar::Null, Scalar::Number)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

/// Zero-argument getter producing a scalar at emit time.
pub type Deferred = Arc<dyn Fn() -> Scalar + Send + Sync>;

/// A structured value that can be flattened into query parameters or
/// written out as a JSON document.
#[derive(Clone)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Deferred(Deferred),
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// An empty map, to be filled with [`Value::with`].
    pub fn map() -> Self {
        Value::Map(Vec::new())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn deferred<F>(getter: F) -> Self
    where
        F: Fn() -> Scalar + Send + Sync + 'static,
    {
        Value::Deferred(Arc::new(getter))
    }

    /// Builder-style insert. On a non-map value the value is replaced by a
    /// map holding only the new entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`, keeping the position of an existing entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self {
            Value::Map(entries) => match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            },
            other => *other = Value::Map(vec![(key, value)]),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Lists and maps; the only values the flattener descends into.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Containers and deferred getters always count as present.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_truthy(),
            _ => true,
        }
    }

    /// Collapse to a scalar, calling a deferred getter. Containers have no
    /// scalar form and yield `Null`.
    pub fn resolve(&self) -> Scalar {
        match self {
            Value::Scalar(s) => s.clone(),
            Value::Deferred(getter) => getter(),
            Value::List(_) | Value::Map(_) => Scalar::Null,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => s.fmt(f),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
            Value::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::Deferred(getter) => getter().serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<T: Into<Scalar>> From<T> for Value {
    fn from(value: T) -> Self {
        Value::Scalar(value.into())
    }
}

/// Object keys follow `serde_json::Map` iteration order, which is sorted
/// unless serde_json's `preserve_order` feature is enabled.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One named input of a form, serialized without any key-path construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: Scalar,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Payload attached to a request.
#[derive(Debug, Clone)]
pub enum RequestData {
    /// Already-encoded query string, passed through untouched.
    Query(String),
    /// Flat list of form fields.
    Fields(Vec<FormField>),
    /// Structured value: flattened for query strings, JSON for bodies.
    Value(Value),
}

impl RequestData {
    /// Data that travels as a query string rather than as a JSON body:
    /// raw strings and anything list-shaped.
    pub fn is_query_shaped(&self) -> bool {
        match self {
            RequestData::Query(_) | RequestData::Fields(_) => true,
            RequestData::Value(v) => matches!(v, Value::List(_) | Value::Scalar(Scalar::String(_))),
        }
    }

    /// Whether the data counts as supplied at all. Falsy values (empty string,
    /// `null`, `false`, `0`) are treated like no data.
    pub fn is_present(&self) -> bool {
        match self {
            RequestData::Query(q) => !q.is_empty(),
            RequestData::Fields(_) => true,
            RequestData::Value(v) => v.is_truthy(),
        }
    }
}

impl From<&str> for RequestData {
    fn from(value: &str) -> Self {
        RequestData::Query(value.to_string())
    }
}

impl From<String> for RequestData {
    fn from(value: String) -> Self {
        RequestData::Query(value)
    }
}

impl From<Vec<FormField>> for RequestData {
    fn from(value: Vec<FormField>) -> Self {
        RequestData::Fields(value)
    }
}

impl From<Value> for RequestData {
    fn from(value: Value) -> Self {
        RequestData::Value(value)
    }
}

impl From<serde_json::Value> for RequestData {
    fn from(value: serde_json::Value) -> Self {
        RequestData::Value(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_truthiness_follows_falsy_set() {
        assert!(!Scalar::Null.is_truthy());
        assert!(!Scalar::from(false).is_truthy());
        assert!(!Scalar::from(0).is_truthy());
        assert!(!Scalar::from("").is_truthy());
        assert!(Scalar::from("0").is_truthy());
        assert!(Scalar::from(-1).is_truthy());
    }

    #[test]
    fn scalar_display() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::from(true).to_string(), "true");
        assert_eq!(Scalar::from(42).to_string(), "42");
        assert_eq!(Scalar::from(1.5).to_string(), "1.5");
        assert_eq!(Scalar::from("a b").to_string(), "a b");
    }

    #[test]
    fn whole_floats_are_written_as_integers() {
        assert_eq!(Scalar::from(1.0).to_string(), "1");
        assert_eq!(Scalar::from(-3.0).to_string(), "-3");
        assert_eq!(Scalar::from(2.5).to_string(), "2.5");

        let v = Value::map().with("a", 1.0).with("b", 2.5);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"a":1,"b":2.5}"#);

        let v = Value::from(serde_json::json!({"n": 3.0}));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"n":3}"#);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut v = Value::map().with("a", 1).with("b", 2);
        v.insert("a", 3);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn deferred_is_resolved_when_serialized() {
        let v = Value::map().with("now", Value::deferred(|| Scalar::from("later")));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"now":"later"}"#);
    }

    #[test]
    fn converts_from_json() {
        let v = Value::from(serde_json::json!({"a": [1, {"b": null}]}));
        let back = serde_json::to_value(&v).unwrap();
        assert_eq!(back, serde_json::json!({"a": [1, {"b": null}]}));
    }

    #[test]
    fn list_data_is_query_shaped() {
        assert!(RequestData::from("a=1").is_query_shaped());
        assert!(RequestData::from(vec![FormField::new("a", "1")]).is_query_shaped());
        assert!(RequestData::from(Value::list([1, 2])).is_query_shaped());
        assert!(RequestData::from(Value::from("a=1")).is_query_shaped());
        assert!(!RequestData::from(Value::map().with("a", 1)).is_query_shaped());
    }

    #[test]
    fn falsy_data_is_not_present() {
        assert!(!RequestData::from("").is_present());
        assert!(!RequestData::from(Value::null()).is_present());
        assert!(!RequestData::from(Value::from(0)).is_present());
        assert!(RequestData::from(Vec::<FormField>::new()).is_present());
        assert!(RequestData::from(Value::map()).is_present());
    }
}
