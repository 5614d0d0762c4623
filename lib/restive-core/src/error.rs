//! Error types for restive.
//!
//! Two layers:
//! - [`Error`] is what a transport, an interceptor or a body read can fail with.
//! - [`RequestError`] is what a client call returns: the request method and URL
//!   around a [`Failure`] (transport error, status mismatch, or decode error).

use derive_more::{Display, Error, From};
use http::Method;
use url::Url;

use crate::ValidationError;

// ============================================================================
// Transport Error
// ============================================================================

/// Errors raised below the validation layer.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The response body could not be read.
    #[display("failed to read response body: {_0}")]
    #[from(skip)]
    Body(#[error(not(source))] String),

    /// Invalid request, also used by interceptors to abort a request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Invalid header name or value.
    #[display("invalid header {name:?}: {reason}")]
    #[from(skip)]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a body read error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Decode Error
// ============================================================================

/// The response body did not deserialize into the destination type.
#[derive(Debug, Display, Error, From)]
#[display("failed to unmarshal the response body: {source}")]
pub struct DecodeError {
    source: serde_path_to_error::Error<serde_json::Error>,
}

impl DecodeError {
    /// Path to the field that failed (e.g. `user.address.city`), `.` for the root.
    #[must_use]
    pub fn path(&self) -> String {
        self.source.path().to_string()
    }

    /// The underlying `serde_json` error.
    #[must_use]
    pub fn inner(&self) -> &serde_json::Error {
        self.source.inner()
    }
}

// ============================================================================
// Request Error
// ============================================================================

/// What went wrong once a request was handed to the transport.
#[derive(Debug, Display, From)]
pub enum Failure {
    /// The transport (or an interceptor) failed; no response is available.
    Transport(Error),
    /// A response arrived with a status outside the expected set.
    Status(ValidationError),
    /// The response body could not be decoded into the destination.
    Decode(DecodeError),
}

impl Failure {
    fn as_error(&self) -> &(dyn std::error::Error + 'static) {
        match self {
            Self::Transport(err) => err,
            Self::Status(err) => err,
            Self::Decode(err) => err,
        }
    }
}

/// A failed client call, carrying the request method and URL.
///
/// `source()` returns the inner error directly, so callers can walk the
/// chain down to a [`ValidationError`], a [`DecodeError`] or a transport
/// [`Error`].
#[derive(Debug, Display)]
#[display("request {method} {url} failed: {failure}")]
pub struct RequestError {
    method: Method,
    url: Url,
    failure: Failure,
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.failure.as_error())
    }
}

impl RequestError {
    /// Wrap a failure with request context.
    #[must_use]
    pub fn new(method: Method, url: Url, failure: impl Into<Failure>) -> Self {
        Self {
            method,
            url,
            failure: failure.into(),
        }
    }

    /// HTTP method of the failed request.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// URL of the failed request.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// The wrapped failure.
    #[must_use]
    pub const fn failure(&self) -> &Failure {
        &self.failure
    }

    /// Consume into the wrapped failure.
    #[must_use]
    pub fn into_failure(self) -> Failure {
        self.failure
    }

    /// The status mismatch, if that is what failed.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationError> {
        match &self.failure {
            Failure::Status(err) => Some(err),
            _ => None,
        }
    }

    /// The observed status code when the failure is a status mismatch.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.validation().map(ValidationError::status)
    }

    /// Returns `true` if the response status was not expected.
    #[must_use]
    pub const fn is_status_mismatch(&self) -> bool {
        matches!(self.failure, Failure::Status(_))
    }

    /// Returns `true` if the body could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self.failure, Failure::Decode(_))
    }

    /// Returns `true` if no response was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.failure, Failure::Transport(_))
    }
}
