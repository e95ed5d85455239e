//! # fmdata Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The session token manager
//! - Port interfaces (traits) for token persistence and remote sessions
//!
//! ## Architecture Principles
//! - Only depends on `fmdata-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;

pub use auth::{SessionGateway, SessionProbe, TokenManager, TokenManagerError, TokenStore};
