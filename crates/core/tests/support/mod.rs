//! Shared test helpers for `fmdata-core` integration tests.
//!
//! These helpers provide lightweight in-memory doubles for the token manager
//! ports so scenario tests can focus on behaviour instead of boilerplate.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod mocks;
