//! Request serialization and HTTP helpers over a host transport, plus a thin
//! element façade over a host document.
//!
//! # Overview
//! - [`serialize`] flattens nested maps and lists into a bracket-path query
//!   string (`a[0][x]=1&a[]=2`).
//! - [`RequestClient`] issues GET / POST / PUT requests. It builds
//!   `HttpRequest` values, hands them to a [`Transport`] supplied by the host,
//!   and decodes the response according to the requested or inferred
//!   [`ResponseType`] before calling the caller's single-shot callback.
//! - [`dom`] wraps host element handles behind [`dom::ElementHandle`] and
//!   [`dom::ElementCollectionHandle`].
//!
//! # Design
//! - No I/O and no global state: the transport is injected, the client is a
//!   plain value.
//! - Argument errors are returned synchronously; request failures arrive
//!   through the callback as a [`RequestFailure`].
//! - The positional `url, [data], [callback], [dataType]` calling convention is
//!   kept in [`compat`] and maps onto the typed [`RequestOptions`].

pub mod client;
pub mod compat;
pub mod config;
pub mod dom;
pub mod error;
pub mod http;
pub mod options;
pub mod response;
pub mod serialize;
pub mod transport;
pub mod value;

pub use client::{parse_response, RequestClient};
pub use compat::{handle_arguments, Arg};
pub use config::ClientConfig;
pub use error::{Error, RequestFailure};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{RequestOptions, ResponseCallback, ResponseOutcome};
pub use response::{ResponseBody, ResponseType};
pub use serialize::{serialize, serialize_data, serialize_fields};
pub use transport::{Completion, Transport, TransportError};
pub use value::{FormField, RequestData, Scalar, Value};
