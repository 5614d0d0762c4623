//! Default transport using hyper-util.

use std::fmt;

use bytes::Bytes;
use futures_util::{StreamExt, TryStreamExt, stream};
use http_body_util::{BodyStream, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::time::{Instant, timeout_at};

use crate::{
    Body, Error, HttpClient, Request, Response, Result, TransportConfig,
    connector::https_connector,
};

/// HTTP transport over hyper-util with connection pooling and rustls.
///
/// The configured timeout bounds the whole exchange. The body is streamed to
/// the caller under the same deadline: a chunk that arrives too late fails the
/// read with [`Error::Timeout`]. Dropping the body closes the connection, or
/// returns it to the pool.
///
/// # Example
///
/// ```ignore
/// use restive::{HyperTransport, TransportConfig};
/// use std::time::Duration;
///
/// let transport = HyperTransport::with_config(
///     TransportConfig::builder()
///         .timeout(Duration::from_secs(10))
///         .build(),
/// );
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with a custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let connector = https_connector(&config);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let uri = url
            .as_str()
            .parse::<http::Uri>()
            .map_err(|e| Error::invalid_request(e.to_string()))?;

        let mut hyper_request = http::Request::new(body.map_or_else(Full::default, Full::new));
        *hyper_request.method_mut() = method;
        *hyper_request.uri_mut() = uri;
        *hyper_request.headers_mut() = headers;

        Ok(hyper_request)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for HyperTransport {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Body>> {
        let hyper_request = Self::build_hyper_request(request)?;

        let deadline = Instant::now() + self.config.timeout;

        let response = timeout_at(deadline, self.inner.request(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let (parts, incoming) = response.into_parts();

        let chunks = BodyStream::new(incoming)
            .map_ok(|frame| frame.into_data().unwrap_or_default())
            .map_err(|e| Error::body(e.to_string()));

        // The stream ends after yielding the timeout error.
        let body = Body::from_stream(stream::unfold(
            Some(Box::pin(chunks)),
            move |state| async move {
                let mut chunks = state?;
                match timeout_at(deadline, chunks.next()).await {
                    Ok(Some(chunk)) => Some((chunk, Some(chunks))),
                    Ok(None) => None,
                    Err(_) => Some((Err(Error::Timeout), None)),
                }
            },
        ));

        Ok(Response::new(parts.status.as_u16(), parts.headers, body))
    }
}
