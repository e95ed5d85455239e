//! # fmdata Domain
//!
//! Domain types shared by every fmdata crate.
//!
//! This crate contains:
//! - Record and token types exchanged with the FileMaker Data API
//! - The Data API error code enumeration and remote error bodies
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other fmdata crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
