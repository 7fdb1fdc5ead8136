use http::StatusCode;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers before the header list spills to the heap.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Response header storage. Names are `Arc<str>` so cloning the response
/// template for every synthesized response stays cheap.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Normalized HTTP response produced by a dispatch.
///
/// Actions may build one directly; otherwise the dispatcher derives one from
/// the application's response template (see [`crate::app::AppContext::response`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderVec,
    body: String,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderVec::new(),
            body: String::new(),
        }
    }
}

impl Response {
    /// `200 OK` with the given body and no headers.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Error response whose body is the canonical reason phrase.
    #[must_use]
    pub fn error(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: status_reason(status).to_string(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Response body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.body
    }

    pub fn set_content(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    #[must_use]
    pub fn into_content(self) -> String {
        self.body
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Header lookup, case-insensitive per RFC 7230.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    /// Convert into an `http::Response` for a host server.
    ///
    /// Headers that are not valid HTTP header names or values are skipped.
    #[must_use]
    pub fn into_http(self) -> http::Response<String> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            let (Ok(name), Ok(value)) = (
                http::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(value),
            ) else {
                continue;
            };
            builder = builder.header(name, value);
        }
        builder
            .body(self.body)
            .unwrap_or_else(|_| http::Response::new(String::new()))
    }
}

fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}
