//! Tower middleware for the transport stack.
//!
//! Anything implementing `tower::Layer` over
//! `Service<Request, Response = Response<Body>, Error = Error>` can be added
//! with [`RestClientBuilder::layer`](crate::RestClientBuilder::layer). Request
//! interceptors live in [`crate::interceptor`]; this module holds the layers
//! that observe whole round trips.
//!
//! - [`LoggingLayer`] - Logs round trips using `tracing`
//!
//! There is no retry layer here. A retry policy is one more layer added by the
//! caller, e.g. `tower::retry::RetryLayer`.

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
