//! httpbin-style echo server used to exercise the request client end-to-end.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/get`, `/post` and `/put` send back.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    /// Query parameters; a repeated key becomes an array.
    pub args: serde_json::Map<String, serde_json::Value>,
    /// Request headers, names lowercased.
    pub headers: BTreeMap<String, String>,
    /// Raw request body.
    pub data: String,
    /// Request body parsed as JSON, when it is JSON.
    pub json: Option<serde_json::Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/get", get(echo_get))
        .route("/post", post(echo_post))
        .route("/put", put(echo_put))
        .route("/status/{code}", get(status))
        .route("/bytes/{n}", get(bytes))
        .route("/html", get(html))
        .route("/broken-json", get(broken_json))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo_get(Query(pairs): Query<Vec<(String, String)>>, headers: HeaderMap) -> Json<Echo> {
    Json(echo("GET", pairs, &headers, String::new()))
}

async fn echo_post(
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    Json(echo("POST", pairs, &headers, body))
}

async fn echo_put(
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    Json(echo("PUT", pairs, &headers, body))
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn bytes(Path(n): Path<usize>) -> impl IntoResponse {
    let body: Vec<u8> = (0..n).map(|i| (i % 256) as u8).collect();
    ([(header::CONTENT_TYPE, "application/octet-stream")], body)
}

async fn html() -> Html<&'static str> {
    Html("<html><body><h1>echo</h1></body></html>")
}

async fn broken_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{\"unterminated\": ")
}

fn echo(method: &str, pairs: Vec<(String, String)>, headers: &HeaderMap, data: String) -> Echo {
    tracing::debug!(method, args = pairs.len(), body_len = data.len(), "echo");
    Echo {
        method: method.to_string(),
        args: collect_args(pairs),
        headers: headers
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect(),
        json: serde_json::from_str(&data).ok(),
        data,
    }
}

fn collect_args(pairs: Vec<(String, String)>) -> serde_json::Map<String, serde_json::Value> {
    use serde_json::Value;

    let mut args = serde_json::Map::new();
    for (k, v) in pairs {
        match args.get_mut(&k) {
            Some(Value::Array(items)) => items.push(Value::String(v)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(v)]);
            }
            None => {
                args.insert(k, Value::String(v));
            }
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_args_become_arrays() {
        let args = collect_args(pairs(&[("a[]", "1"), ("a[]", "2"), ("a[]", "3"), ("b", "x")]));
        assert_eq!(args["a[]"], serde_json::json!(["1", "2", "3"]));
        assert_eq!(args["b"], "x");
    }

    #[test]
    fn echo_parses_json_body() {
        let e = echo("POST", Vec::new(), &HeaderMap::new(), r#"{"a":1}"#.to_string());
        assert_eq!(e.json, Some(serde_json::json!({"a": 1})));
        assert_eq!(e.data, r#"{"a":1}"#);
    }

    #[test]
    fn echo_non_json_body_has_no_json() {
        let e = echo("PUT", Vec::new(), &HeaderMap::new(), "a=1".to_string());
        assert!(e.json.is_none());
    }

    #[test]
    fn echo_roundtrips_through_json() {
        let e = echo("GET", pairs(&[("q", "1")]), &HeaderMap::new(), String::new());
        let back: Echo = serde_json::from_str(&serde_json::to_string(&e).unwrap()).unwrap();
        assert_eq!(back, e);
    }
}
