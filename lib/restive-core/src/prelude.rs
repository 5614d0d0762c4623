//! Prelude module for convenient imports.
//!
//! ```ignore
//! use restive_core::prelude::*;
//! ```

pub use crate::{
    Body, ContentType, Error, ExpectedStatus, HttpClient, Method, Request, RequestBuilder,
    RequestError, Response, Result, StatusCode, ValidationError, from_json, to_json,
};
