//! # fmdata Infrastructure
//!
//! Infrastructure implementations of the core ports plus the Data API
//! client itself.
//!
//! This crate contains:
//! - SQLite token store (r2d2 pool over rusqlite)
//! - HTTP transport and the Data API session gateway
//! - Record client (create, read, edit, delete, find, globals)
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `fmdata-core`
//! - Depends on `fmdata-domain` and `fmdata-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod observability;
pub mod service;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiError, ApiErrorCategory, FmsClient, FmsSessionGateway};
pub use database::{DbManager, SqliteTokenStore};
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::init_tracing;
pub use service::{FmDataService, SqlTokenManager};
