//! Request client: builds requests, hands them to the transport, decodes the
//! outcome.
//!
//! # Design
//! `RequestClient` holds a transport and its configuration and carries no
//! state between calls. Each operation is split the same way the I/O boundary
//! is: `build_*` produces an `HttpRequest` (pure, validates arguments),
//! [`parse_response`] turns the transport's report into the caller's outcome
//! (pure). `get` / `post` / `put` glue the two around `Transport::send`.
//!
//! Argument errors are returned from the call before the transport is touched.
//! Everything that happens after the request is issued, failure included,
//! reaches the caller through the callback only.

use crate::compat::{handle_arguments, Arg};
use crate::config::ClientConfig;
use crate::error::{Error, RequestFailure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{RequestOptions, ResponseCallback, ResponseOutcome};
use crate::response::{self, ResponseType};
use crate::serialize::serialize_data;
use crate::transport::{Completion, Transport, TransportError};
use crate::value::RequestData;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_JSON: &str = "application/json";

/// Client issuing GET / POST / PUT requests through a host transport.
#[derive(Debug, Clone)]
pub struct RequestClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> RequestClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET with `data` serialized into the query string.
    pub fn get(&self, options: impl Into<RequestOptions>) -> Result<(), Error> {
        let options = options.into();
        let request = self.build_get(&options)?;
        self.dispatch(request, options);
        Ok(())
    }

    /// POST with `data` as a query string or a JSON body, depending on its shape.
    pub fn post(&self, options: impl Into<RequestOptions>) -> Result<(), Error> {
        let options = options.into();
        let request = self.build_post(&options)?;
        self.dispatch(request, options);
        Ok(())
    }

    /// PUT; `data` is required.
    pub fn put(&self, options: impl Into<RequestOptions>) -> Result<(), Error> {
        let options = options.into();
        let request = self.build_put(&options)?;
        self.dispatch(request, options);
        Ok(())
    }

    /// `get(url, [data], [callback], [dataType])` in positional form.
    pub fn get_args(&self, args: Vec<Arg>) -> Result<(), Error> {
        self.get(handle_arguments(args)?)
    }

    pub fn post_args(&self, args: Vec<Arg>) -> Result<(), Error> {
        self.post(handle_arguments(args)?)
    }

    pub fn put_args(&self, args: Vec<Arg>) -> Result<(), Error> {
        self.put(handle_arguments(args)?)
    }

    pub fn build_get(&self, options: &RequestOptions) -> Result<HttpRequest, Error> {
        self.build_query_request(HttpMethod::Get, options)
    }

    pub fn build_post(&self, options: &RequestOptions) -> Result<HttpRequest, Error> {
        self.build_with_body(HttpMethod::Post, options)
    }

    pub fn build_put(&self, options: &RequestOptions) -> Result<HttpRequest, Error> {
        if present_data(options).is_none() {
            return Err(Error::invalid("a PUT request must include data"));
        }
        self.build_with_body(HttpMethod::Put, options)
    }

    fn build_with_body(&self, method: HttpMethod, options: &RequestOptions) -> Result<HttpRequest, Error> {
        let data = present_data(options);
        match data {
            Some(RequestData::Value(value)) if !data.is_some_and(RequestData::is_query_shaped) => {
                let url = self.checked_url(options)?;
                let body = serde_json::to_string(value)?;
                Ok(self.request(method, url, APPLICATION_JSON, Some(body), options.data_type))
            }
            _ => self.build_query_request(method, options),
        }
    }

    fn build_query_request(&self, method: HttpMethod, options: &RequestOptions) -> Result<HttpRequest, Error> {
        let mut url = self.checked_url(options)?;
        if let Some(data) = present_data(options) {
            append_query(&mut url, &serialize_data(data)?);
        }
        Ok(self.request(method, url, FORM_URLENCODED, None, options.data_type))
    }

    fn checked_url(&self, options: &RequestOptions) -> Result<String, Error> {
        if options.url.is_empty() {
            return Err(Error::invalid("URL string argument must be provided"));
        }
        Ok(self.config.resolve_url(&options.url))
    }

    fn request(
        &self,
        method: HttpMethod,
        url: String,
        content_type: &str,
        body: Option<String>,
        data_type: Option<ResponseType>,
    ) -> HttpRequest {
        let mut headers = self.config.default_headers.clone();
        headers.push(("Content-Type".to_string(), content_type.to_string()));
        HttpRequest {
            method,
            url,
            headers,
            body,
            response_type: data_type.filter(|t| *t == ResponseType::Document),
        }
    }

    fn dispatch(&self, request: HttpRequest, options: RequestOptions) {
        let RequestOptions { callback, data_type, .. } = options;
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(method = method.as_str(), url = %url, "sending request");

        self.transport.send(
            request,
            Completion::new(move |outcome| {
                let result = parse_response(outcome, data_type);
                deliver(method, &url, result, callback);
            }),
        );
    }
}

/// Turn a transport report into the caller's outcome.
///
/// 2xx responses are decoded per `data_type` (or the `Content-Type` header);
/// anything else, including a transport error, becomes a `RequestFailure`.
pub fn parse_response(
    outcome: Result<HttpResponse, TransportError>,
    data_type: Option<ResponseType>,
) -> ResponseOutcome {
    let response = outcome.map_err(|e| RequestFailure::new(0, e.0))?;
    if !response.is_success() {
        return Err(RequestFailure::new(response.status, response.status_text));
    }
    Ok(response::decode(response, data_type))
}

fn deliver(method: HttpMethod, url: &str, result: ResponseOutcome, callback: Option<ResponseCallback>) {
    match &result {
        Ok(body) => tracing::debug!(method = method.as_str(), url, body = ?body, "response received"),
        Err(failure) => tracing::error!(method = method.as_str(), url, error = %failure, "request failed"),
    }
    if let Some(callback) = callback {
        callback.call(result);
    }
}

fn present_data(options: &RequestOptions) -> Option<&RequestData> {
    options.data.as_ref().filter(|d| d.is_present())
}

/// Append a serialized query to `url`. Empty queries add nothing; a query that
/// already starts with `?` is appended verbatim.
fn append_query(url: &mut String, query: &str) {
    if query.is_empty() {
        return;
    }
    if !query.starts_with('?') {
        url.push(if url.contains('?') { '&' } else { '?' });
    }
    url.push_str(query);
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::response::ResponseBody;
    use crate::value::{FormField, Value};

    /// Records every request and answers with a canned outcome.
    #[derive(Default)]
    struct StubTransport {
        sent: Mutex<Vec<HttpRequest>>,
        reply: Mutex<Option<Result<HttpResponse, TransportError>>>,
    }

    impl StubTransport {
        fn replying(reply: Result<HttpResponse, TransportError>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reply: Mutex::new(Some(reply)),
            }
        }

        fn last(&self) -> HttpRequest {
            self.sent.lock().unwrap().last().cloned().expect("nothing sent")
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: HttpRequest, done: Completion) {
            self.sent.lock().unwrap().push(request);
            let reply = self.reply.lock().unwrap().take();
            done.complete(reply.unwrap_or_else(|| Ok(ok_response("text/plain", ""))));
        }
    }

    fn ok_response(content_type: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.as_bytes().to_vec(),
            document: None,
        }
    }

    fn capture() -> (Arc<Mutex<Vec<ResponseOutcome>>>, impl FnOnce(ResponseOutcome) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |outcome| sink.lock().unwrap().push(outcome))
    }

    #[test]
    fn get_without_data_has_no_query_and_no_body() {
        let client = RequestClient::new(StubTransport::default());
        client.get("http://localhost/get").unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost/get");
        assert!(req.body.is_none());
        assert_eq!(req.header("content-type"), Some(FORM_URLENCODED));
    }

    #[test]
    fn get_appends_serialized_query() {
        let client = RequestClient::new(StubTransport::default());
        let data = Value::map().with("a", "1").with("b", Value::list([1, 2]));
        client.get(RequestOptions::new("/get").data(data)).unwrap();
        assert_eq!(client.transport().last().url, "/get?a=1&b[]=1&b[]=2");
    }

    #[test]
    fn get_with_empty_query_adds_no_question_mark() {
        let client = RequestClient::new(StubTransport::default());
        client.get(RequestOptions::new("/get").data(Value::map())).unwrap();
        assert_eq!(client.transport().last().url, "/get");
    }

    #[test]
    fn get_with_prefixed_raw_query() {
        let client = RequestClient::new(StubTransport::default());
        client.get(RequestOptions::new("/get").data("?x=1")).unwrap();
        assert_eq!(client.transport().last().url, "/get?x=1");
    }

    #[test]
    fn post_object_is_json() {
        let client = RequestClient::new(StubTransport::default());
        client.post(RequestOptions::new("/post").data(Value::map().with("a", 1))).unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("Content-Type"), Some(APPLICATION_JSON));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(req.url, "/post");
    }

    #[test]
    fn post_whole_float_body_has_no_fraction() {
        let client = RequestClient::new(StubTransport::default());
        client.post(RequestOptions::new("/p").data(Value::map().with("a", 1.0))).unwrap();
        assert_eq!(client.transport().last().body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn post_form_fields_are_query_encoded() {
        let client = RequestClient::new(StubTransport::default());
        client
            .post(RequestOptions::new("/post").data(vec![FormField::new("a", "1")]))
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.header("Content-Type"), Some(FORM_URLENCODED));
        assert_eq!(req.url, "/post?a=1");
        assert!(req.body.is_none());
    }

    #[test]
    fn post_list_value_is_form_fields() {
        let client = RequestClient::new(StubTransport::default());
        let fields = Value::list([Value::map().with("name", "a").with("value", "1")]);
        client.post(RequestOptions::new("/post").data(fields)).unwrap();
        let req = client.transport().last();
        assert_eq!(req.header("Content-Type"), Some(FORM_URLENCODED));
        assert_eq!(req.url, "/post?a=1");
    }

    #[test]
    fn post_without_data_is_form_encoded() {
        let client = RequestClient::new(StubTransport::default());
        client.post("/post").unwrap();
        let req = client.transport().last();
        assert_eq!(req.header("Content-Type"), Some(FORM_URLENCODED));
        assert!(req.body.is_none());
    }

    #[test]
    fn put_requires_data() {
        let client = RequestClient::new(StubTransport::default());
        let err = client.put("/put").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("PUT")));
        assert_eq!(client.transport().count(), 0);
    }

    #[test]
    fn put_object_is_json() {
        let client = RequestClient::new(StubTransport::default());
        client.put(RequestOptions::new("/put").data(Value::map().with("a", "b"))).unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body.as_deref(), Some(r#"{"a":"b"}"#));
    }

    #[test]
    fn empty_url_is_rejected_before_sending() {
        let client = RequestClient::new(StubTransport::default());
        assert!(client.get("").is_err());
        assert!(client.get_args(vec![]).is_err());
        assert_eq!(client.transport().count(), 0);
    }

    #[test]
    fn falsy_data_counts_as_absent() {
        let client = RequestClient::new(StubTransport::default());
        client.get(RequestOptions::new("/get").data(Value::null())).unwrap();
        assert_eq!(client.transport().last().url, "/get");

        let err = client.put(RequestOptions::new("/put").data("")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(client.transport().count(), 1);
    }

    #[test]
    fn post_string_value_is_query() {
        let client = RequestClient::new(StubTransport::default());
        client.post(RequestOptions::new("/post").data(Value::from("a=1"))).unwrap();
        let req = client.transport().last();
        assert_eq!(req.url, "/post?a=1");
        assert!(req.body.is_none());
    }

    #[test]
    fn default_headers_and_base_url_apply() {
        let config = ClientConfig::with_base_url("http://api.local/").header("X-Requested-With", "XMLHttpRequest");
        let client = RequestClient::with_config(StubTransport::default(), config);
        client.get("/items").unwrap();
        let req = client.transport().last();
        assert_eq!(req.url, "http://api.local/items");
        assert_eq!(
            req.headers,
            vec![
                ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
                ("Content-Type".to_string(), FORM_URLENCODED.to_string()),
            ]
        );
    }

    #[test]
    fn document_data_type_is_forwarded_to_transport() {
        let client = RequestClient::new(StubTransport::default());
        client
            .get(RequestOptions::new("/page").data_type(ResponseType::Document))
            .unwrap();
        assert_eq!(client.transport().last().response_type, Some(ResponseType::Document));

        client.get(RequestOptions::new("/page").data_type(ResponseType::Json)).unwrap();
        assert_eq!(client.transport().last().response_type, None);
    }

    #[test]
    fn success_invokes_callback_once_with_decoded_body() {
        let transport = StubTransport::replying(Ok(ok_response("application/json", r#"{"x":1}"#)));
        let client = RequestClient::new(transport);
        let (seen, cb) = capture();
        client.get(RequestOptions::new("/get").callback(cb)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], Ok(ResponseBody::Json(serde_json::json!({"x": 1}))));
    }

    #[test]
    fn non_2xx_invokes_failure_once() {
        let response = HttpResponse {
            status: 404,
            status_text: "Not Found".to_string(),
            ..Default::default()
        };
        let client = RequestClient::new(StubTransport::replying(Ok(response)));
        let (seen, cb) = capture();
        client.get(RequestOptions::new("/missing").callback(cb)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], Err(RequestFailure::new(404, "Not Found")));
    }

    #[test]
    fn transport_error_is_status_zero() {
        let client = RequestClient::new(StubTransport::replying(Err(TransportError("connection refused".into()))));
        let (seen, cb) = capture();
        client.post(RequestOptions::new("/post").callback(cb)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[Err(RequestFailure::new(0, "connection refused"))]);
    }

    #[test]
    fn positional_arguments_route_through_adapter() {
        let transport = StubTransport::replying(Ok(ok_response("application/json", "[1]")));
        let client = RequestClient::new(transport);
        let (seen, cb) = capture();
        client
            .post_args(vec!["/post".into(), vec![FormField::new("a", "1")].into(), Arg::callback(cb)])
            .unwrap();

        assert_eq!(client.transport().last().url, "/post?a=1");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_callback_discards_response() {
        let client = RequestClient::new(StubTransport::replying(Ok(ok_response("text/plain", "ok"))));
        client.get("/get").unwrap();
        assert_eq!(client.transport().count(), 1);
    }

    #[test]
    fn parse_response_explicit_text_overrides_json_header() {
        let outcome = parse_response(Ok(ok_response("application/json", r#"{"x":1}"#)), Some(ResponseType::Text));
        assert_eq!(outcome, Ok(ResponseBody::Text(r#"{"x":1}"#.to_string())));
    }

    #[test]
    fn parse_response_malformed_json_is_raw_text() {
        let outcome = parse_response(Ok(ok_response("application/json", "not json")), None);
        assert_eq!(outcome, Ok(ResponseBody::Text("not json".to_string())));
    }
}
