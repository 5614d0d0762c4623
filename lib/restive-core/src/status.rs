//! Expected status codes and the status mismatch error.

use std::fmt;

use bytes::Bytes;
use derive_more::{Display, Error};
use http::{HeaderMap, StatusCode};

use crate::DecodeError;

// ============================================================================
// Expected Status Codes
// ============================================================================

/// The ordered, non-empty set of status codes a call accepts.
///
/// Displays as `[200, 202]`, in the order the codes were supplied.
///
/// ```
/// use restive_core::ExpectedStatus;
///
/// let expected = ExpectedStatus::from_codes(&[200, 202]);
/// assert!(expected.contains(202));
/// assert_eq!(expected.to_string(), "[200, 202]");
///
/// // No codes means `200 OK`
/// assert_eq!(ExpectedStatus::from_codes(&[]).codes(), &[200]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedStatus(Vec<u16>);

impl ExpectedStatus {
    /// Status accepted when the caller gives none.
    pub const DEFAULT: u16 = StatusCode::OK.as_u16();

    /// Build from the caller's codes, defaulting to `[200]` when empty.
    #[must_use]
    pub fn from_codes(codes: &[u16]) -> Self {
        if codes.is_empty() {
            Self::default()
        } else {
            Self(codes.to_vec())
        }
    }

    /// Membership test over the whole set.
    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.0.contains(&status)
    }

    /// The codes, in supplied order.
    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.0
    }
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        Self(vec![Self::DEFAULT])
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, code) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code}")?;
        }
        f.write_str("]")
    }
}

// ============================================================================
// Validation Error
// ============================================================================

/// Why a response with an unexpected status failed: its body, or why the body
/// could not be read.
#[derive(Debug, Display, Error)]
pub enum ErrorBody {
    /// The body text, used as the error message.
    #[display("{_0}")]
    Message(#[error(not(source))] String),

    /// Reading the body failed.
    #[display("failed to read API error body: {_0}")]
    Unreadable(crate::Error),
}

/// A response arrived with a status code outside the expected set.
#[derive(Debug, Display, Error)]
#[display("wrong status code ({status} not in {expected}): {cause}")]
pub struct ValidationError {
    status: u16,
    expected: ExpectedStatus,
    #[error(source)]
    cause: ErrorBody,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl ValidationError {
    /// Create a validation error without response headers or raw body.
    #[must_use]
    pub fn new(status: u16, expected: ExpectedStatus, cause: ErrorBody) -> Self {
        Self {
            status,
            expected,
            cause,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attach the raw response body.
    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// The status code actually received.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// The codes that were accepted.
    #[must_use]
    pub const fn expected(&self) -> &ExpectedStatus {
        &self.expected
    }

    /// The error body or the read failure.
    #[must_use]
    pub const fn cause(&self) -> &ErrorBody {
        &self.cause
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw response body, if it could be read.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns `true` if the status is 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Returns `true` if the status is 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Decode the captured error body as JSON.
    ///
    /// Returns `None` when the body could not be read.
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct ApiError { error: String }
    ///
    /// if let Some(validation) = err.validation() {
    ///     if let Some(Ok(api)) = validation.decode_body::<ApiError>() {
    ///         tracing::warn!(error = %api.error, "API rejected the call");
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<Result<T, DecodeError>> {
        self.body.as_ref().map(|body| crate::from_json(body))
    }
}
