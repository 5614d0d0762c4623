//! Type-erased transport stack.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{Body, Error, HttpClient, Request, Response, Result};

/// Type-erased service for middleware composition.
pub type BoxedService = BoxCloneService<Request<Bytes>, Response<Body>, Error>;

/// Future returned by the transport stack.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Body>>> + Send + 'static>>;

/// Adapts an [`HttpClient`] into the innermost tower service.
pub(crate) struct TransportService<C> {
    client: Arc<C>,
}

impl<C> TransportService<C> {
    pub(crate) fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl<C> Clone for TransportService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C> Service<Request<Bytes>> for TransportService<C>
where
    C: HttpClient + 'static,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let client = Arc::clone(&self.client);
        Box::pin(async move { client.execute(request).await })
    }
}

/// Thread-safe handle on a [`BoxedService`].
///
/// `BoxCloneService` is not `Sync`; the mutex is held only to clone it.
#[derive(Clone)]
pub(crate) struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    pub(crate) fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// A fresh clone of the stack.
    pub(crate) fn service(&self) -> BoxedService {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn call(&self, request: Request<Bytes>) -> ServiceFuture {
        Box::pin(self.service().oneshot(request))
    }
}
