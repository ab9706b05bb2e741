//! Error types for the request client, serializer and element façade.
//!
//! # Design
//! Errors come in two flavours that never mix. `Error` is returned
//! synchronously from a call, before any transport interaction, when the
//! caller handed over something unusable. `RequestFailure` describes a request
//! that was issued but did not succeed; it only ever reaches the caller through
//! the response callback.

use thiserror::Error;

/// Errors returned synchronously by client, serializer and façade calls.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed argument (URL, PUT data, serializer input, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The JSON request body could not be produced.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// A request that completed without a 2xx status, or never completed at all.
///
/// Transport-level errors (connection refused, DNS, ...) carry status code `0`
/// and the transport's message as `status_text`, mirroring what a browser
/// request object reports in that situation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct RequestFailure {
    pub status_code: u16,
    pub status_text: String,
}

impl RequestFailure {
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
        }
    }

    /// HTTP/2 responses carry no reason phrase, so the text part is optional.
    fn describe(&self) -> String {
        if self.status_text.is_empty() {
            self.status_code.to_string()
        } else {
            format!("{} - {}", self.status_code, self.status_text)
        }
    }
}
