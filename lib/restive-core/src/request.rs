//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, query parameters, and bodies.
//!
//! # Example
//!
//! ```
//! use restive_core::{Method, Request};
//!
//! let request = Request::builder(Method::GET, "https://api.example.com/health".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("verbose", "true")
//!     .build()
//!     .expect("valid request");
//!
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use crate::{ContentType, Error, Result};

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<B>,
}

impl<B> Request<B> {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers, used by interceptors.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Single header value by name, if it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HeaderMap, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

impl Request<Bytes> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder<Bytes> {
        RequestBuilder::new(method, url)
    }

    /// Returns `true` if the request carries a non-empty body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|body| !body.is_empty())
    }
}

/// Builder for constructing [`Request`] instances.
///
/// Header errors are kept until [`RequestBuilder::build`], like `http::request::Builder`.
#[derive(Debug)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<B>,
    error: Option<Error>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    ///
    /// # Errors
    ///
    /// Returns the first invalid header given to [`RequestBuilder::header`].
    pub fn build(self) -> Result<Request<B>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        })
    }
}

impl RequestBuilder<Bytes> {
    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self> {
        let body = crate::to_json(value)?;
        self.headers
            .insert(CONTENT_TYPE, ContentType::Json.header_value());
        Ok(self.body(body))
    }

}

/// Validate a header name and value.
///
/// # Errors
///
/// Returns [`Error::InvalidHeader`] naming the header as supplied.
pub fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|err| Error::invalid_header(name, err))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|err| Error::invalid_header(name, err))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://api.example.com{path}")).expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::GET, url("/health"))
            .header("Accept", "application/json")
            .build()
            .expect("request");

        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://api.example.com/health");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
        assert!(!request.has_body());
    }

    #[test]
    fn request_builder_with_query() {
        let request = Request::builder(Method::GET, url("/users"))
            .query("page", "1")
            .query("limit", "10")
            .build()
            .expect("request");

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/users?page=1&limit=10"
        );
    }

    #[test]
    fn request_builder_json() {
        #[derive(serde::Serialize)]
        struct Ping {
            status: String,
        }

        let request = Request::builder(Method::POST, url("/ping"))
            .json(&Ping {
                status: "ok".to_string(),
            })
            .expect("json")
            .build()
            .expect("request");

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert!(request.has_body());
    }

    #[test]
    fn empty_body_is_not_a_body() {
        let request = Request::builder(Method::POST, url("/ping"))
            .body(Bytes::new())
            .build()
            .expect("request");

        assert!(request.body().is_some());
        assert!(!request.has_body());
    }

    #[test]
    fn invalid_header_fails_at_build() {
        let result = Request::builder(Method::GET, url("/health"))
            .header("bad header", "value")
            .header("Accept", "application/json")
            .build();

        let err = result.expect_err("invalid header name");
        assert!(matches!(err, Error::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[test]
    fn parse_header_checks_name_and_value() {
        let (name, value) = parse_header("X-Api-Key", "secret").expect("valid header");
        assert_eq!(name.as_str(), "x-api-key");
        assert_eq!(value, "secret");

        assert!(parse_header("bad header", "value").is_err());
        let err = parse_header("X-Api-Key", "line\nbreak").expect_err("invalid value");
        assert_eq!(
            err.to_string(),
            "invalid header \"X-Api-Key\": failed to parse header value"
        );
    }
}
