//! Request interceptors.
//!
//! An interceptor is a tower layer that runs a [`RequestUpdater`] on every
//! outgoing request before handing it to the inner service. If the updater
//! fails, the call ends with its error and nothing is sent.
//!
//! Interceptors nest like any tower layer: installing one wraps the current
//! transport stack, so the last installed runs first and sees what earlier
//! ones have not yet done. Only the innermost service talks to the network.
//!
//! # Available Updaters
//!
//! - [`SetHeader`] - Sets a fixed header (API keys, bearer or basic auth)
//! - [`SetContentType`] - Sets `Content-Type` on requests that carry a body
//! - Any `Fn(&mut Request) -> Result<()>` closure
//!
//! # Example
//!
//! ```ignore
//! use restive::{RestClient, HyperTransport};
//! use restive::interceptor::SetHeader;
//!
//! let client = RestClient::builder(HyperTransport::new())
//!     .interceptor(SetHeader::new("X-Api-Key", "secret")?)
//!     .interceptor(|request: &mut restive::Request| -> restive::Result<()> {
//!         tracing::debug!(url = %request.url(), "outgoing");
//!         Ok(())
//!     })
//!     .build();
//! ```

mod content_type;
mod header;

use std::fmt;
use std::future::{Future, ready};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

pub use content_type::SetContentType;
pub use header::SetHeader;

use crate::{Body, Error, Request, Response, Result};

/// Mutates an outgoing request, or rejects it.
pub trait RequestUpdater: Send + Sync + 'static {
    /// Update the request in place.
    ///
    /// # Errors
    ///
    /// An error aborts the call before any I/O.
    fn update(&self, request: &mut Request<Bytes>) -> Result<()>;
}

impl<F> RequestUpdater for F
where
    F: Fn(&mut Request<Bytes>) -> Result<()> + Send + Sync + 'static,
{
    fn update(&self, request: &mut Request<Bytes>) -> Result<()> {
        self(request)
    }
}

/// Layer that runs a [`RequestUpdater`] before the inner service.
pub struct InterceptLayer<U> {
    updater: Arc<U>,
}

impl<U: RequestUpdater> InterceptLayer<U> {
    /// Create a layer around the given updater.
    pub fn new(updater: U) -> Self {
        Self {
            updater: Arc::new(updater),
        }
    }
}

impl<U> Clone for InterceptLayer<U> {
    fn clone(&self) -> Self {
        Self {
            updater: Arc::clone(&self.updater),
        }
    }
}

impl<U> fmt::Debug for InterceptLayer<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptLayer").finish_non_exhaustive()
    }
}

impl<S, U> Layer<S> for InterceptLayer<U> {
    type Service = Intercept<S, U>;

    fn layer(&self, inner: S) -> Self::Service {
        Intercept {
            inner,
            updater: Arc::clone(&self.updater),
        }
    }
}

/// Service that runs a [`RequestUpdater`] before delegating.
pub struct Intercept<S, U> {
    inner: S,
    updater: Arc<U>,
}

impl<S: Clone, U> Clone for Intercept<S, U> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            updater: Arc::clone(&self.updater),
        }
    }
}

impl<S: fmt::Debug, U> fmt::Debug for Intercept<S, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercept")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S, U> Service<Request<Bytes>> for Intercept<S, U>
where
    S: Service<Request<Bytes>, Response = Response<Body>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
    U: RequestUpdater,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        if let Err(err) = self.updater.update(&mut request) {
            tracing::debug!(url = %request.url(), error = %err, "interceptor rejected request");
            return Box::pin(ready(Err(err)));
        }

        // The polled service is the ready one; keep a fresh clone for the next call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::{HeaderMap, Method};
    use tower::limit::ConcurrencyLimitLayer;
    use tower::{ServiceBuilder, ServiceExt, service_fn};

    use super::*;

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("https://api.example.com/health").expect("valid URL");
        Request::builder(Method::GET, url).build().expect("request")
    }

    #[tokio::test]
    async fn updater_runs_before_inner_service() {
        let service = ServiceBuilder::new()
            .layer(InterceptLayer::new(|request: &mut Request<Bytes>| -> Result<()> {
                request
                    .headers_mut()
                    .insert("x-marker", http::HeaderValue::from_static("set"));
                Ok(())
            }))
            .service(service_fn(|request: Request<Bytes>| async move {
                let status = if request.header("x-marker") == Some("set") {
                    200
                } else {
                    400
                };
                Ok::<_, Error>(Response::new(status, HeaderMap::new(), Body::empty()))
            }));

        let response = service.oneshot(request()).await.expect("response");
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn failing_updater_skips_inner_service() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let service = ServiceBuilder::new()
            .layer(InterceptLayer::new(|_: &mut Request<Bytes>| -> Result<()> {
                Err(Error::invalid_request("missing credentials"))
            }))
            .service(service_fn(move |_: Request<Bytes>| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>(Response::new(200, HeaderMap::new(), Body::empty())) }
            }));

        let err = service.oneshot(request()).await.expect_err("aborted");
        assert!(matches!(
            err,
            Error::InvalidRequest(ref message) if message == "missing credentials"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn calls_the_inner_service_that_was_made_ready() {
        let mut service = ServiceBuilder::new()
            .layer(InterceptLayer::new(|_: &mut Request<Bytes>| -> Result<()> { Ok(()) }))
            .layer(ConcurrencyLimitLayer::new(1))
            .service(service_fn(|_: Request<Bytes>| async {
                Ok::<_, Error>(Response::new(204, HeaderMap::new(), Body::empty()))
            }));

        for _ in 0..3 {
            let response = service
                .ready()
                .await
                .expect("ready")
                .call(request())
                .await
                .expect("response");
            assert_eq!(response.status(), 204);
        }
    }
}
