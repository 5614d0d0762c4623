//! Content-Type interceptor.

use bytes::Bytes;
use http::HeaderValue;
use http::header::CONTENT_TYPE;

use super::RequestUpdater;
use crate::{ContentType, Error, Request, Result};

/// Sets `Content-Type` on requests that carry a non-empty body.
///
/// Bodyless requests (a plain `GET`, an empty `POST`) are left untouched.
#[derive(Debug, Clone)]
pub struct SetContentType {
    value: HeaderValue,
}

impl SetContentType {
    /// Use the given media type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if `value` is not a valid header value.
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let value = HeaderValue::from_str(value.as_ref())
            .map_err(|err| Error::invalid_header(CONTENT_TYPE.as_str(), err))?;
        Ok(Self { value })
    }

    /// `application/json; charset=utf-8`.
    #[must_use]
    pub const fn json() -> Self {
        Self {
            value: ContentType::JsonUtf8.header_value(),
        }
    }

    /// The value that will be set.
    #[must_use]
    pub const fn value(&self) -> &HeaderValue {
        &self.value
    }
}

impl From<ContentType> for SetContentType {
    fn from(content_type: ContentType) -> Self {
        Self {
            value: content_type.header_value(),
        }
    }
}

impl RequestUpdater for SetContentType {
    fn update(&self, request: &mut Request<Bytes>) -> Result<()> {
        if request.has_body() {
            request.headers_mut().insert(CONTENT_TYPE, self.value.clone());
        }
        Ok(())
    }
}
