//! Prelude module for convenient imports.
//!
//! ```ignore
//! use restive::prelude::*;
//! ```

pub use crate::interceptor::{RequestUpdater, SetContentType, SetHeader};
pub use crate::{
    Body, ContentType, Error, ExpectedStatus, HttpClient, HyperTransport, Method, Request,
    RequestBuilder, RequestError, Response, RestClient, RestClientBuilder, Result, StatusCode,
    TransportConfig, ValidationError, from_json, to_json,
};
pub use serde::{Deserialize, Serialize};
