//! Fixed header interceptor.

use base64::Engine;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{HeaderName, HeaderValue};
use restive_core::parse_header;

use super::RequestUpdater;
use crate::{Error, Request, Result};

/// Sets one header to a fixed value on every request, replacing any value
/// already present.
///
/// The name and value are validated when the updater is created, so a bad
/// header is reported at install time rather than per request.
///
/// # Example
///
/// ```
/// use restive::interceptor::SetHeader;
///
/// let api_key = SetHeader::new("X-Api-Key", "secret").expect("valid header");
/// assert_eq!(api_key.name(), "x-api-key");
///
/// assert!(SetHeader::new("X Api Key", "secret").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SetHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl SetHeader {
    /// Set `name: value` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the name or value is not a valid header.
    pub fn new(name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        Ok(Self { name, value })
    }

    /// Set `Authorization: Bearer <token>` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the token is not a valid header value.
    pub fn bearer(token: impl AsRef<str>) -> Result<Self> {
        Self::sensitive(AUTHORIZATION, &format!("Bearer {}", token.as_ref()))
    }

    /// Set `Authorization: Basic <base64(username:password)>` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the encoded value is rejected.
    pub fn basic(username: impl AsRef<str>, password: impl AsRef<str>) -> Result<Self> {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self::sensitive(AUTHORIZATION, &format!("Basic {encoded}"))
    }

    fn sensitive(name: HeaderName, value: &str) -> Result<Self> {
        let mut value =
            HeaderValue::from_str(value).map_err(|err| Error::invalid_header(name.as_str(), err))?;
        value.set_sensitive(true);
        Ok(Self { name, value })
    }

    /// Header name, lowercased.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Header value.
    #[must_use]
    pub const fn value(&self) -> &HeaderValue {
        &self.value
    }
}

impl RequestUpdater for SetHeader {
    fn update(&self, request: &mut Request<Bytes>) -> Result<()> {
        request
            .headers_mut()
            .insert(self.name.clone(), self.value.clone());
        Ok(())
    }
}
