//! Core types and traits for the restive REST client.
//!
//! This crate provides the transport-agnostic building blocks used by restive:
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] and [`Body`] - HTTP response with a single-use body
//! - [`HttpClient`] - The transport capability trait
//! - [`ExpectedStatus`] - The acceptable status codes for a call
//! - [`Error`], [`RequestError`], [`ValidationError`], [`DecodeError`] - Error model
//! - [`Method`], [`StatusCode`], [`header`] - Re-exported from the `http` crate

mod body;
mod client;
mod error;
pub mod prelude;
mod request;
mod response;
mod status;

pub use body::{ContentType, from_json, to_json};
pub use client::HttpClient;
pub use error::{DecodeError, Error, Failure, RequestError, Result};
pub use request::{Request, RequestBuilder, parse_header};
pub use response::{Body, BodyStream, Response};
pub use status::{ErrorBody, ExpectedStatus, ValidationError};

// Re-export http crate types for methods, status codes and headers
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
