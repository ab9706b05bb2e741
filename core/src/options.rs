//! Per-call request description.
//!
//! # Design
//! `RequestOptions` is built explicitly by the caller with builder methods.
//! It lives for a single call and is consumed by the client. The loose
//! positional form lives in [`crate::compat`] and produces the same type.

use std::fmt;

use crate::error::RequestFailure;
use crate::response::{ResponseBody, ResponseType};
use crate::value::RequestData;

/// What a response callback receives: the decoded body or the failure.
pub type ResponseOutcome = Result<ResponseBody, RequestFailure>;

/// Single-shot handler for the outcome of a request.
pub struct ResponseCallback(Box<dyn FnOnce(ResponseOutcome) + Send>);

impl ResponseCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        ResponseCallback(Box::new(f))
    }

    pub fn call(self, outcome: ResponseOutcome) {
        (self.0)(outcome)
    }
}

impl fmt::Debug for ResponseCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseCallback(..)")
    }
}

/// Everything one `get`/`post`/`put` call needs.
#[derive(Debug)]
pub struct RequestOptions {
    pub url: String,
    pub data: Option<RequestData>,
    pub callback: Option<ResponseCallback>,
    pub data_type: Option<ResponseType>,
}

impl RequestOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            data: None,
            callback: None,
            data_type: None,
        }
    }

    pub fn data(mut self, data: impl Into<RequestData>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        self.callback = Some(ResponseCallback::new(f));
        self
    }

    pub fn data_type(mut self, data_type: ResponseType) -> Self {
        self.data_type = Some(data_type);
        self
    }
}

impl From<&str> for RequestOptions {
    fn from(url: &str) -> Self {
        RequestOptions::new(url)
    }
}

impl From<String> for RequestOptions {
    fn from(url: String) -> Self {
        RequestOptions::new(url)
    }
}
