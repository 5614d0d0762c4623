//! Body serialization utilities.

use bytes::Bytes;
use http::HeaderValue;

use crate::{DecodeError, Result};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// JSON content type with an explicit charset (`application/json; charset=utf-8`).
    JsonUtf8,
    /// Plain text content type (`text/plain`).
    PlainText,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::JsonUtf8 => "application/json; charset=utf-8",
            Self::PlainText => "text/plain",
        }
    }

    /// The MIME type as a header value.
    #[must_use]
    pub const fn header_value(&self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use restive_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Ping { status: String }
///
/// let ping = Ping { status: "ok".to_string() };
/// let bytes = to_json(&ping).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"status":"ok"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes, reporting the path of the failing field.
///
/// # Example
///
/// ```
/// use restive_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Health { status: String }
///
/// let health: Health = from_json(br#"{"status":"ok"}"#).expect("deserialize");
/// assert_eq!(health, Health { status: "ok".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
) -> std::result::Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    Ok(serde_path_to_error::deserialize(&mut deserializer)?)
}
