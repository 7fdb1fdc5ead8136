use super::params::{params_from_json, parse_urlencoded, ParamBag};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::response::HeaderVec;
use anyhow::Context;
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Incoming request as seen by controllers.
///
/// Shared read-only (`Arc<Request>`) between a controller and every
/// controller it forwards to.
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    method: Method,
    scheme: String,
    /// Host, with the port when it is not the scheme default
    host: String,
    path: String,
    query_string: Option<String>,
    query: ParamBag,
    body: ParamBag,
    attributes: ParamBag,
    headers: HeaderVec,
}

impl Request {
    /// Build a request from an absolute URI such as `http://www.example.org/hej/hopp?a=1`.
    pub fn new(method: Method, uri: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(uri)?;
        Ok(Self::from_url(method, &url))
    }

    /// Shorthand for a `GET` request.
    pub fn get(uri: &str) -> Result<Self, url::ParseError> {
        Self::new(Method::GET, uri)
    }

    fn from_url(method: Method, url: &Url) -> Self {
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => String::new(),
        };
        let query_string = url.query().map(str::to_string);
        let query = query_string
            .as_deref()
            .map(parse_urlencoded)
            .unwrap_or_default();

        Self {
            id: RequestId::new(),
            method,
            scheme: url.scheme().to_string(),
            host,
            path: url.path().to_string(),
            query_string,
            query,
            body: ParamBag::new(),
            attributes: ParamBag::new(),
            headers: HeaderVec::new(),
        }
    }

    /// Convert an `http::Request` handed over by a host server.
    ///
    /// The authority comes from the URI or the `Host` header; form-encoded and
    /// JSON bodies populate the body parameters.
    pub fn from_http(req: http::Request<Vec<u8>>) -> anyhow::Result<Self> {
        let (parts, body) = req.into_parts();
        let scheme = parts.uri.scheme_str().unwrap_or("http");
        let authority = parts
            .uri
            .authority()
            .map(|a| a.as_str().to_string())
            .or_else(|| {
                parts
                    .headers
                    .get(http::header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "localhost".to_string());
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let url = Url::parse(&format!("{scheme}://{authority}{path_and_query}"))
            .with_context(|| format!("invalid request target '{path_and_query}'"))?;
        let mut request = Self::from_url(parts.method, &url);

        for (name, value) in &parts.headers {
            if let Ok(value) = value.to_str() {
                request.headers.push((Arc::from(name.as_str()), value.to_string()));
            }
        }
        request.id = RequestId::from_header_or_new(request.header(REQUEST_ID_HEADER));

        if !body.is_empty() {
            let content_type = request.header("content-type").unwrap_or("").to_ascii_lowercase();
            if content_type.starts_with("application/x-www-form-urlencoded") {
                request.body = parse_urlencoded(&String::from_utf8_lossy(&body));
            } else if content_type.starts_with("application/json") {
                let json: Value =
                    serde_json::from_slice(&body).context("request body is not valid JSON")?;
                request.body = params_from_json(json);
            } else {
                debug!(
                    request_id = %request.id,
                    content_type = %content_type,
                    body_len = body.len(),
                    "Body not parsed into parameters"
                );
            }
        }

        Ok(request)
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: &ParamBag) -> Self {
        self.attributes.merge(attributes);
        self
    }

    #[must_use]
    pub fn with_body_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name, value);
        self
    }

    /// Replace the body parameters with a parsed form body.
    #[must_use]
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.body = parse_urlencoded(body);
        self
    }

    /// Replace the body parameters with the fields of a JSON object.
    #[must_use]
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = params_from_json(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `scheme://host[:port]`, e.g. `http://www.example.org`.
    #[must_use]
    pub fn scheme_and_host(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// Path plus query string as received.
    #[must_use]
    pub fn request_uri(&self) -> String {
        match &self.query_string {
            Some(q) if !q.is_empty() => format!("{}?{}", self.path, q),
            _ => self.path.clone(),
        }
    }

    /// Query-string parameters.
    #[must_use]
    pub fn query(&self) -> &ParamBag {
        &self.query
    }

    /// Body (form or JSON) parameters.
    #[must_use]
    pub fn body(&self) -> &ParamBag {
        &self.body
    }

    /// Route attributes, e.g. `{id}` captured from `/pets/{id}`.
    #[must_use]
    pub fn attributes(&self) -> &ParamBag {
        &self.attributes
    }

    /// Header lookup, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_splits_uri() {
        let req = Request::get("http://www.example.org/hej/hopp?a=1").unwrap();
        assert_eq!(req.scheme_and_host(), "http://www.example.org");
        assert_eq!(req.path(), "/hej/hopp");
        assert_eq!(req.request_uri(), "/hej/hopp?a=1");
        assert_eq!(req.query().get_str("a"), Some("1"));
    }

    #[test]
    fn test_non_default_port_is_kept() {
        let req = Request::get("https://localhost:8443/").unwrap();
        assert_eq!(req.scheme_and_host(), "https://localhost:8443");
        let req = Request::get("https://localhost:443/").unwrap();
        assert_eq!(req.scheme_and_host(), "https://localhost");
    }

    #[test]
    fn test_from_http_uses_host_header_and_form_body() {
        let http_req = http::Request::builder()
            .method(Method::POST)
            .uri("/pets?debug=true")
            .header("host", "api.example.org")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(b"name=Fluffy&species=cat".to_vec())
            .unwrap();
        let req = Request::from_http(http_req).unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.scheme_and_host(), "http://api.example.org");
        assert_eq!(req.query().get_str("debug"), Some("true"));
        assert_eq!(req.body().get_str("name"), Some("Fluffy"));
        assert_eq!(req.header("HOST"), Some("api.example.org"));
    }

    #[test]
    fn test_from_http_parses_json_body() {
        let http_req = http::Request::builder()
            .method(Method::POST)
            .uri("http://example.org/pets")
            .header("content-type", "application/json")
            .body(br#"{"name":"Rex","age":3}"#.to_vec())
            .unwrap();
        let req = Request::from_http(http_req).unwrap();
        assert_eq!(req.body().get("age"), Some(&json!(3)));
    }

    #[test]
    fn test_from_http_rejects_malformed_json() {
        let http_req = http::Request::builder()
            .uri("http://example.org/pets")
            .header("content-type", "application/json")
            .body(b"{oops".to_vec())
            .unwrap();
        assert!(Request::from_http(http_req).is_err());
    }

    #[test]
    fn test_request_id_header_is_honoured() {
        let id = RequestId::new();
        let http_req = http::Request::builder()
            .uri("http://example.org/")
            .header(REQUEST_ID_HEADER, id.to_string())
            .body(Vec::new())
            .unwrap();
        assert_eq!(Request::from_http(http_req).unwrap().id(), id);
    }
}
