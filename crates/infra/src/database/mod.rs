//! Database implementations

pub mod manager;
pub mod token_repository;

pub use manager::*;
pub use token_repository::*;
