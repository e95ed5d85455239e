//! Configuration management

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_LOG_FILTER, DEFAULT_TIMEOUT_SECONDS,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub fms: FmsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the Data API.
///
/// The camelCase spellings (`fmsUrl`, `authLayout`, ...) are accepted as
/// aliases so existing configuration files keep loading.
#[derive(Clone, Serialize, Deserialize)]
pub struct FmsConfig {
    /// Base URL of the Data API, e.g. `https://fms.example.com/fmi/rest/api/`.
    #[serde(alias = "fmsUrl")]
    pub fms_url: String,
    /// Solution (database) name.
    pub solution: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Layout used to create sessions and to probe them.
    #[serde(alias = "authLayout")]
    pub auth_layout: String,
    #[serde(default = "default_timeout_seconds", alias = "timeoutSeconds")]
    pub timeout_seconds: u64,
    /// Skip TLS certificate verification (self-signed server certificates).
    #[serde(default, alias = "acceptInvalidCerts")]
    pub accept_invalid_certs: bool,
    /// Route requests through the proxies named by `HTTPS_PROXY` and friends.
    #[serde(default = "default_use_system_proxy", alias = "useSystemProxy")]
    pub use_system_proxy: bool,
    /// Reuse a validated token for this long without probing it again.
    /// `0` probes on every acquisition.
    #[serde(default, alias = "validationTtlSeconds")]
    pub validation_ttl_seconds: u64,
}

impl FmsConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    #[must_use]
    pub const fn validation_ttl(&self) -> Duration {
        Duration::from_secs(self.validation_ttl_seconds)
    }
}

impl fmt::Debug for FmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmsConfig")
            .field("fms_url", &self.fms_url)
            .field("solution", &self.solution)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_layout", &self.auth_layout)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("use_system_proxy", &self.use_system_proxy)
            .field("validation_ttl_seconds", &self.validation_ttl_seconds)
            .finish()
    }
}

/// Token store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

const fn default_use_system_proxy() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_camel_case_aliases() {
        let config: Config = serde_json::from_str(
            r#"{
                "fms": {
                    "fmsUrl": "https://fms.local/fmi/rest/api/",
                    "solution": "Tasks",
                    "username": "admin",
                    "password": "secret",
                    "authLayout": "Auth"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.fms.fms_url, "https://fms.local/fmi/rest/api/");
        assert_eq!(config.fms.auth_layout, "Auth");
        assert_eq!(config.fms.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(!config.fms.accept_invalid_certs);
        assert!(config.fms.use_system_proxy);
        assert_eq!(config.database.path, DEFAULT_DB_PATH);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn debug_output_hides_password() {
        let config = FmsConfig {
            fms_url: "https://fms.local/".into(),
            solution: "Tasks".into(),
            username: "admin".into(),
            password: "hunter2".into(),
            auth_layout: "Auth".into(),
            timeout_seconds: 30,
            accept_invalid_certs: false,
            use_system_proxy: true,
            validation_ttl_seconds: 0,
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
