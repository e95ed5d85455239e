//! FileMaker Data API client
//!
//! This module provides the HTTP side of the crate: session creation and
//! probing for the token manager, and the record operations (create, read,
//! edit, delete, find, globals) built on top of it.
//!
//! # Architecture
//!
//! - Uses [`crate::http::HttpClient`] (no direct reqwest clients)
//! - One request per operation, no retry
//! - Remote error bodies are surfaced verbatim as [`ApiError::Remote`]
//! - Every request is bounded by the HTTP client timeout

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod errors;
mod response;

pub use auth::{AccessTokenProvider, FmsSessionGateway};
pub use client::{FmsClient, FmsClientBuilder};
pub use endpoints::FmsEndpoints;
pub use errors::{ApiError, ApiErrorCategory};
