//! Round-trip logging middleware.
//!
//! Logs every transport round trip with `tracing`. Only the status and the
//! elapsed time until the headers are logged: the body is still unread when
//! the response passes through this layer.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Body, Error, Request, Response, Result};

/// Layer that adds round-trip logging.
///
/// # Example
///
/// ```ignore
/// use restive::middleware::LoggingLayer;
///
/// let client = RestClient::builder(HyperTransport::new())
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level, including request headers.
    Debug,
    /// Log at info level, method, URL and status only.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs round trips.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Body>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method().clone();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "round_trip", %method, %url);

        // The polled service is the ready one; keep a fresh clone for the next call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        debug!(headers = ?request.headers(), "sending request");
                    }
                    LogLevel::Info => {
                        info!("sending request");
                    }
                }

                let result = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        info!(status = response.status(), elapsed_ms, "response received");
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "round trip failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, Method};
    use tower::{ServiceExt, service_fn};

    use super::*;

    #[test]
    fn logging_layer_default() {
        assert_eq!(LoggingLayer::new().level, LogLevel::Info);
        assert_eq!(LoggingLayer::debug().level, LogLevel::Debug);
    }

    #[tokio::test]
    async fn logging_passes_response_through() {
        let service = LoggingLayer::debug().layer(service_fn(|_: Request<Bytes>| async {
            Ok::<_, Error>(Response::new(204, HeaderMap::new(), Body::empty()))
        }));

        let url = url::Url::parse("https://api.example.com/ping").expect("valid URL");
        let request = Request::builder(Method::DELETE, url).build().expect("request");

        let response = service.oneshot(request).await.expect("response");
        assert_eq!(response.status(), 204);
    }
}
