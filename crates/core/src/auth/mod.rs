//! Session token management
//!
//! The token manager hands out Data API session tokens that the server
//! accepts at the time of return.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  lookup → create (if needed) → probe → refresh on 952
//! └────────┬────────┘
//!          │
//!          ├──► TokenStore      (append-only persistence of issued tokens)
//!          └──► SessionGateway  (create / probe sessions on the server)
//! ```
//!
//! Both collaborators are traits so infrastructure can supply SQLite and
//! HTTP implementations while tests use in-memory doubles.

pub mod ports;
pub mod token_manager;

pub use ports::{SessionGateway, SessionProbe, TokenStore};
pub use token_manager::{TokenManager, TokenManagerError};
