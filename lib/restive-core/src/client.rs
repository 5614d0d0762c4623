//! The transport capability.
//!
//! [`HttpClient`] is the only thing restive needs from a networking stack:
//! take a request, return a response. The hyper transport, a mock, or a
//! recorder all plug in the same way.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Body, Request, Response, Result};

/// Core HTTP transport trait.
///
/// Implementations must be safe to call concurrently; each call owns its
/// request and the returned response.
///
/// # Example
///
/// ```
/// use restive_core::{Body, HeaderMap, HttpClient, Request, Response, Result};
///
/// struct AlwaysOk;
///
/// impl HttpClient for AlwaysOk {
///     async fn execute(&self, _request: Request) -> Result<Response<Body>> {
///         Ok(Response::new(200, HeaderMap::new(), Body::from(r#"{"status":"ok"}"#)))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send {
        (**self).execute(request)
    }
}
