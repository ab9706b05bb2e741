//! Response-type resolution and body decoding.
//!
//! # Design
//! The decoding of a successful response is decided once: an explicit
//! `ResponseType` from the caller wins, otherwise the type is inferred from
//! the `Content-Type` header. Decoding never fails; a JSON body that does not
//! parse comes back as text with a warning in the log.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::http::HttpResponse;

/// How the caller wants a response body decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Text,
    Json,
    Blob,
    ArrayBuffer,
    Document,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Text => "text",
            ResponseType::Json => "json",
            ResponseType::Blob => "blob",
            ResponseType::ArrayBuffer => "arraybuffer",
            ResponseType::Document => "document",
        }
    }

    /// Infer the decoding from a `Content-Type` header value.
    pub fn infer(content_type: Option<&str>) -> ResponseType {
        let ct = content_type.unwrap_or_default().to_ascii_lowercase();
        if ct.contains("text") {
            return ResponseType::Text;
        }
        if ct.contains("application") {
            if ct.contains("json") {
                return ResponseType::Json;
            }
            if ct.contains("octet-stream") {
                return ResponseType::Blob;
            }
            return ResponseType::Text;
        }
        if ct.contains("image") || ct.contains("audio") || ct.contains("video") {
            return ResponseType::Blob;
        }
        tracing::warn!(content_type = %ct, "unexpected content type, decoding as text");
        ResponseType::Text
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ResponseType::Text),
            "json" => Ok(ResponseType::Json),
            "blob" => Ok(ResponseType::Blob),
            "arraybuffer" => Ok(ResponseType::ArrayBuffer),
            "document" => Ok(ResponseType::Document),
            other => Err(Error::invalid(format!("unknown response type: {other}"))),
        }
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(serde_json::Value),
    Blob(Vec<u8>),
    ArrayBuffer(Vec<u8>),
    Document(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) | ResponseBody::Document(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Blob(b) | ResponseBody::ArrayBuffer(b) => Some(b),
            _ => None,
        }
    }
}

/// Resolve the response type and decode the body of a successful response.
pub fn decode(response: HttpResponse, requested: Option<ResponseType>) -> ResponseBody {
    let kind = requested.unwrap_or_else(|| ResponseType::infer(response.header("content-type")));
    match kind {
        ResponseType::Text => ResponseBody::Text(response.text()),
        ResponseType::Json => match serde_json::from_slice(&response.body) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                let raw = response.text();
                tracing::warn!(error = %e, body = %raw, "invalid JSON response, returning raw text");
                ResponseBody::Text(raw)
            }
        },
        ResponseType::Blob => ResponseBody::Blob(response.body),
        ResponseType::ArrayBuffer => ResponseBody::ArrayBuffer(response.body),
        ResponseType::Document => {
            let doc = match response.document {
                Some(doc) => doc,
                None => String::from_utf8_lossy(&response.body).into_owned(),
            };
            ResponseBody::Document(doc)
        }
    }
}
