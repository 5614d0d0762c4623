//! Thin REST client for JSON APIs.
//!
//! A [`RestClient`] sends a [`Request`], checks the response status against the
//! codes the caller expects, and decodes the JSON body. Failures come back as a
//! [`RequestError`] naming the method and URL, wrapping the transport error, the
//! [`ValidationError`] for an unexpected status, or the [`DecodeError`].
//!
//! Outgoing requests can be adjusted by [interceptors](interceptor), and any
//! tower [`Layer`](tower::Layer) can be added to the transport stack.
//!
//! # Example
//!
//! ```ignore
//! use restive::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Health {
//!     status: String,
//! }
//!
//! let client = RestClient::builder(HyperTransport::new())
//!     .header("X-Api-Key", "secret")?
//!     .json_content_type()
//!     .build();
//!
//! let request = Request::builder(Method::GET, "https://api.example.com/health".parse()?)
//!     .build()?;
//! let health: Health = client.fetch(request, &[200]).await?;
//! ```

mod config;
mod connector;
pub mod interceptor;
pub mod middleware;
pub mod prelude;
mod rest_client;
mod service;
mod transport;

pub use config::{DEFAULT_TIMEOUT, TransportConfig, TransportConfigBuilder};
pub use rest_client::{RestClient, RestClientBuilder};
pub use service::{BoxedService, ServiceFuture};
pub use transport::HyperTransport;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use restive_core::{
    Body, BodyStream, ContentType, DecodeError, Error, ErrorBody, ExpectedStatus, Failure,
    HttpClient, Request, RequestBuilder, RequestError, Response, Result, ValidationError,
    from_json, to_json,
};

// Re-export http types for methods, status codes and headers
pub use restive_core::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};

pub use url::{self, Url};
