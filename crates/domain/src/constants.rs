//! Protocol and default constants
//!
//! Centralized location for the Data API names and the defaults used when a
//! configuration value is omitted.

/// Header carrying the session token on every record operation.
pub const TOKEN_HEADER: &str = "fm-data-token";

// Default configuration values
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_DB_PATH: &str = "fmstoken.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Records requested by a session probe.
pub const PROBE_RANGE: u32 = 1;
