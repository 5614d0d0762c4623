//! The REST client: dispatch, status validation and JSON decoding.

use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;
use tracing::{debug, warn};

use crate::interceptor::{InterceptLayer, RequestUpdater, SetContentType, SetHeader};
use crate::middleware::LoggingLayer;
use crate::service::{BoxedService, SyncService, TransportService};
use crate::{
    Body, Error, ErrorBody, ExpectedStatus, Failure, HttpClient, HyperTransport, Request,
    RequestError, Response, Result, ValidationError,
};

/// REST API client over a pluggable transport.
///
/// Every call sends one request, checks the response status against the
/// expected codes (`[200]` when none are given) and then either decodes the
/// JSON body or returns a [`RequestError`]. The response body is consumed or
/// dropped before the call returns, on every path.
///
/// Cloning is cheap; clones share the transport and its connection pool.
///
/// # Example
///
/// ```ignore
/// use restive::{Method, Request, RestClient};
///
/// #[derive(serde::Deserialize)]
/// struct Health { status: String }
///
/// let client = RestClient::default();
/// let request = Request::builder(Method::GET, "https://api.example.com/health".parse()?)
///     .build()?;
///
/// let health: Health = client.fetch(request, &[200]).await?;
/// ```
#[derive(Clone)]
pub struct RestClient {
    service: SyncService,
    drain_unused_body: bool,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("drain_unused_body", &self.drain_unused_body)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client over the given transport, without interceptors.
    #[must_use]
    pub fn new<C>(transport: C) -> Self
    where
        C: HttpClient + 'static,
    {
        Self::builder(transport).build()
    }

    /// Create a client builder over the given transport.
    #[must_use]
    pub fn builder<C>(transport: C) -> RestClientBuilder
    where
        C: HttpClient + 'static,
    {
        RestClientBuilder {
            service: BoxCloneService::new(TransportService::new(transport)),
            drain_unused_body: true,
        }
    }

    /// Install an interceptor around the current transport stack.
    ///
    /// The new interceptor runs before every interceptor installed earlier.
    /// Clones taken before this call keep the previous stack.
    pub fn install<U: RequestUpdater>(&mut self, updater: U) {
        let service = InterceptLayer::new(updater).layer(self.service.service());
        self.service = SyncService::new(BoxCloneService::new(service));
    }

    /// Send a request and check its status, without decoding the body.
    ///
    /// The body is read to its end and discarded, unless the client was built
    /// with [`RestClientBuilder::drain_unused_body`] set to `false`.
    pub async fn send(
        &self,
        request: Request<Bytes>,
        expected: &[u16],
    ) -> std::result::Result<(), RequestError> {
        let (method, url) = (request.method().clone(), request.url().clone());

        let outcome = match self.checked(request, expected).await {
            Ok(response) => {
                self.release(response.into_body()).await;
                Ok(())
            }
            Err(failure) => Err(failure),
        };

        outcome.map_err(|failure| RequestError::new(method, url, failure))
    }

    /// Send a request, check its status, and decode the JSON body into `destination`.
    ///
    /// `destination` is overwritten only when the call succeeds. Only a
    /// mutable reference is accepted, so a destination that cannot be written
    /// to is rejected at compile time:
    ///
    /// ```compile_fail
    /// # async fn demo(client: restive::RestClient, request: restive::Request) {
    /// #[derive(serde::Deserialize)]
    /// struct Health { status: String }
    ///
    /// let health = Health { status: String::new() };
    /// let _ = client.send_into(request, health, &[200]).await;
    /// # }
    /// ```
    pub async fn send_into<T>(
        &self,
        request: Request<Bytes>,
        destination: &mut T,
        expected: &[u16],
    ) -> std::result::Result<(), RequestError>
    where
        T: DeserializeOwned,
    {
        *destination = self.fetch(request, expected).await?;
        Ok(())
    }

    /// Send a request, check its status, and decode the JSON body.
    pub async fn fetch<T>(
        &self,
        request: Request<Bytes>,
        expected: &[u16],
    ) -> std::result::Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let (method, url) = (request.method().clone(), request.url().clone());

        let outcome = match self.checked(request, expected).await {
            Ok(response) => Self::decode(response).await,
            Err(failure) => Err(failure),
        };

        outcome.map_err(|failure| RequestError::new(method, url, failure))
    }

    /// Dispatch the request and keep the response only if its status is expected.
    async fn checked(
        &self,
        request: Request<Bytes>,
        expected: &[u16],
    ) -> std::result::Result<Response<Body>, Failure> {
        let expected = ExpectedStatus::from_codes(expected);
        debug!(method = %request.method(), url = %request.url(), %expected, "dispatching request");

        let response = self.service.call(request).await.map_err(Failure::Transport)?;
        if expected.contains(response.status()) {
            debug!(status = response.status(), "response accepted");
            return Ok(response);
        }

        let (status, headers, body) = response.into_parts();
        let validation = match body.collect().await {
            Ok(bytes) => {
                let message = String::from_utf8_lossy(&bytes).into_owned();
                ValidationError::new(status, expected, ErrorBody::Message(message))
                    .with_body(bytes)
            }
            Err(err) => ValidationError::new(status, expected, ErrorBody::Unreadable(err)),
        }
        .with_headers(headers);

        warn!(status, expected = %validation.expected(), "unexpected status code");
        Err(Failure::Status(validation))
    }

    async fn decode<T: DeserializeOwned>(
        response: Response<Body>,
    ) -> std::result::Result<T, Failure> {
        let response = response.buffered().await.map_err(Failure::Transport)?;
        response.json().map_err(Failure::Decode)
    }

    async fn release(&self, body: Body) {
        if !self.drain_unused_body {
            drop(body);
            return;
        }
        match body.drain().await {
            Ok(drained) => debug!(drained, "response body drained"),
            Err(err) => debug!(error = %err, "failed to drain response body"),
        }
    }
}

impl Default for RestClient {
    /// A client over [`HyperTransport`] with the default configuration.
    fn default() -> Self {
        Self::new(HyperTransport::new())
    }
}

/// Builder for [`RestClient`].
///
/// Each layer or interceptor wraps everything added before it, so the last
/// one added is the first to see a request.
///
/// # Example
///
/// ```ignore
/// use restive::{HyperTransport, RestClient};
///
/// let client = RestClient::builder(HyperTransport::new())
///     .bearer_auth("my-token")?
///     .json_content_type()
///     .with_logging()
///     .build();
/// ```
pub struct RestClientBuilder {
    service: BoxedService,
    drain_unused_body: bool,
}

impl fmt::Debug for RestClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClientBuilder")
            .field("drain_unused_body", &self.drain_unused_body)
            .finish_non_exhaustive()
    }
}

impl RestClientBuilder {
    /// Wrap the current stack in a tower layer.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService>,
        L::Service: Service<Request<Bytes>, Response = Response<Body>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send + 'static,
    {
        self.service = BoxCloneService::new(layer.layer(self.service));
        self
    }

    /// Install a request interceptor.
    #[must_use]
    pub fn interceptor<U: RequestUpdater>(self, updater: U) -> Self {
        self.layer(InterceptLayer::new(updater))
    }

    /// Set a fixed header on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the header is invalid.
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        Ok(self.interceptor(SetHeader::new(name, value)?))
    }

    /// Set `Authorization: Bearer <token>` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the token is not a valid header value.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Result<Self> {
        Ok(self.interceptor(SetHeader::bearer(token)?))
    }

    /// Set `Authorization: Basic ...` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the credentials cannot be encoded as a header.
    pub fn basic_auth(self, username: impl AsRef<str>, password: impl AsRef<str>) -> Result<Self> {
        Ok(self.interceptor(SetHeader::basic(username, password)?))
    }

    /// Set `Content-Type` on requests with a body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if `value` is not a valid header value.
    pub fn content_type(self, value: impl AsRef<str>) -> Result<Self> {
        Ok(self.interceptor(SetContentType::new(value)?))
    }

    /// Set `Content-Type: application/json; charset=utf-8` on requests with a body.
    #[must_use]
    pub fn json_content_type(self) -> Self {
        self.interceptor(SetContentType::json())
    }

    /// Log each round trip at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log each round trip at debug level, with request headers.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Whether a successful response body that is not decoded is read to its
    /// end (the default) or dropped unread.
    #[must_use]
    pub const fn drain_unused_body(mut self, drain: bool) -> Self {
        self.drain_unused_body = drain;
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> RestClient {
        RestClient {
            service: SyncService::new(self.service),
            drain_unused_body: self.drain_unused_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_is_debug_and_clone() {
        let client = RestClient::builder(HyperTransport::new())
            .drain_unused_body(false)
            .build();
        let cloned = client.clone();

        assert!(format!("{cloned:?}").contains("drain_unused_body: false"));
    }

    #[test]
    fn builder_rejects_invalid_header() {
        let result = RestClient::builder(HyperTransport::new()).header("bad header", "value");
        assert!(matches!(result, Err(Error::InvalidHeader { .. })));

        let result = RestClient::builder(HyperTransport::new()).content_type("text/plain\n");
        assert!(matches!(result, Err(Error::InvalidHeader { .. })));
    }
}
