//! Shared HTTP transport for the Data API.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
