//! HTTP response handling.
//!
//! A transport returns a [`Response<Body>`]: the status and headers are
//! available at once, the [`Body`] is read at most once. Dropping a body
//! releases it, whether it was read or not.

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::StreamExt;
use http::HeaderMap;

use crate::Result;

// ============================================================================
// Body
// ============================================================================

/// A stream of body chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A single-use response body, either buffered or streamed.
pub struct Body {
    kind: Kind,
}

enum Kind {
    Full(Bytes),
    Stream(BodyStream),
}

impl Body {
    /// An empty body.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            kind: Kind::Full(Bytes::new()),
        }
    }

    /// A buffered body.
    #[must_use]
    pub fn full(bytes: impl Into<Bytes>) -> Self {
        Self {
            kind: Kind::Full(bytes.into()),
        }
    }

    /// A streamed body.
    #[must_use]
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            kind: Kind::Stream(Box::pin(stream)),
        }
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error.
    pub async fn collect(self) -> Result<Bytes> {
        match self.kind {
            Kind::Full(bytes) => Ok(bytes),
            Kind::Stream(mut stream) => {
                let mut collected = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    collected.extend_from_slice(&chunk?);
                }
                Ok(collected.freeze())
            }
        }
    }

    /// Read the body to its end, discarding the data, and return how many
    /// bytes were skipped.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error.
    pub async fn drain(self) -> Result<usize> {
        match self.kind {
            Kind::Full(bytes) => Ok(bytes.len()),
            Kind::Stream(mut stream) => {
                let mut drained = 0;
                while let Some(chunk) = stream.next().await {
                    drained += chunk?.len();
                }
                Ok(drained)
            }
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Full(bytes) => f.debug_tuple("Body::Full").field(&bytes.len()).finish(),
            Kind::Stream(_) => f.write_str("Body::Stream"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::full(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::full(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::full(text)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::full(text)
    }
}

// ============================================================================
// Response
// ============================================================================

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Body> {
    status: u16,
    headers: HeaderMap,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub const fn new(status: u16, headers: HeaderMap, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HeaderMap, B) {
        (self.status, self.headers, self.body)
    }
}

impl Response<Body> {
    /// Read the whole body into a buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the body fails.
    pub async fn buffered(self) -> Result<Response<Bytes>> {
        let (status, headers, body) = self.into_parts();
        let bytes = body.collect().await?;
        Ok(Response::new(status, headers, bytes))
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(
        &self,
    ) -> std::result::Result<T, crate::DecodeError> {
        crate::from_json(&self.body)
    }
}
