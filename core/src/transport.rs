//! The host's network capability.
//!
//! The client never performs I/O itself. It hands a finished `HttpRequest` to
//! a `Transport` together with a `Completion`, and the transport reports back
//! exactly once. `Completion` wraps a `FnOnce`, so a second report cannot be
//! expressed.

use std::fmt;

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// Transport-level failure: the exchange did not produce any HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Single-shot completion handler handed to the transport.
pub struct Completion(Box<dyn FnOnce(Result<HttpResponse, TransportError>) + Send>);

impl Completion {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
    {
        Completion(Box::new(f))
    }

    /// Deliver the outcome of the exchange. Consumes the handler.
    pub fn complete(self, outcome: Result<HttpResponse, TransportError>) {
        (self.0)(outcome)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Completion(..)")
    }
}

/// Host-provided primitive that performs one HTTP exchange per `send`.
///
/// Implementations must call `done.complete(..)` exactly once, either before
/// returning or later from whatever event loop drives the exchange.
pub trait Transport {
    fn send(&self, request: HttpRequest, done: Completion);
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest, done: Completion) {
        (**self).send(request, done)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: HttpRequest, done: Completion) {
        (**self).send(request, done)
    }
}
