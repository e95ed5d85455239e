//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory (or its parents) if one
//!    exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! Whatever the source, the result is checked with [`validate`].
//!
//! ## Environment Variables
//! - `FMDATA_FMS_URL`: Data API base URL, e.g. `https://fms.example.com/fmi/rest/api/`
//! - `FMDATA_SOLUTION`: Hosted solution (database) name
//! - `FMDATA_USERNAME`: Account name
//! - `FMDATA_PASSWORD`: Account password
//! - `FMDATA_AUTH_LAYOUT`: Layout used to open and probe sessions
//! - `FMDATA_TIMEOUT_SECONDS`: Per-request timeout (optional, default 30)
//! - `FMDATA_ACCEPT_INVALID_CERTS`: Skip TLS certificate checks (optional)
//! - `FMDATA_USE_SYSTEM_PROXY`: Honour `HTTPS_PROXY` and friends (optional, default on)
//! - `FMDATA_VALIDATION_TTL_SECONDS`: Probe-free token reuse window (optional)
//! - `FMDATA_DB_PATH`: Token database file (optional)
//! - `FMDATA_DB_POOL_SIZE`: Connection pool size (optional)
//! - `FMDATA_LOG_FILTER`: Tracing filter directive (optional)
//! - `FMDATA_LOG_JSON`: Emit JSON log lines (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./fmdata.json` or `./fmdata.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fmdata_domain::{Config, DatabaseConfig, FmDataError, FmsConfig, LoggingConfig, Result};
use url::Url;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `FmDataError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or fail [`validate`]
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// The five server variables are required; everything else falls back to
/// its default.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `FmDataError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let defaults = DatabaseConfig::default();
    let logging_defaults = LoggingConfig::default();

    let fms = FmsConfig {
        fms_url: env_var("FMDATA_FMS_URL")?,
        solution: env_var("FMDATA_SOLUTION")?,
        username: env_var("FMDATA_USERNAME")?,
        password: env_var("FMDATA_PASSWORD")?,
        auth_layout: env_var("FMDATA_AUTH_LAYOUT")?,
        timeout_seconds: env_parse(
            "FMDATA_TIMEOUT_SECONDS",
            fmdata_domain::constants::DEFAULT_TIMEOUT_SECONDS,
        )?,
        accept_invalid_certs: env_bool("FMDATA_ACCEPT_INVALID_CERTS", false),
        use_system_proxy: env_bool("FMDATA_USE_SYSTEM_PROXY", true),
        validation_ttl_seconds: env_parse("FMDATA_VALIDATION_TTL_SECONDS", 0)?,
    };

    let database = DatabaseConfig {
        path: std::env::var("FMDATA_DB_PATH").unwrap_or(defaults.path),
        pool_size: env_parse("FMDATA_DB_POOL_SIZE", defaults.pool_size)?,
    };

    let logging = LoggingConfig {
        filter: std::env::var("FMDATA_LOG_FILTER").unwrap_or(logging_defaults.filter),
        json: env_bool("FMDATA_LOG_JSON", logging_defaults.json),
    };

    Ok(Config { fms, database, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `FmDataError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FmDataError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FmDataError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FmDataError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Check a loaded configuration for values that cannot work.
///
/// # Errors
/// Returns `FmDataError::Config` naming the first offending field.
pub fn validate(config: &Config) -> Result<()> {
    let fms = &config.fms;
    let required = [
        ("fms.fms_url", &fms.fms_url),
        ("fms.solution", &fms.solution),
        ("fms.username", &fms.username),
        ("fms.password", &fms.password),
        ("fms.auth_layout", &fms.auth_layout),
        ("database.path", &config.database.path),
    ];

    if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(FmDataError::Config(format!("{name} must not be empty")));
    }

    let url = Url::parse(&fms.fms_url)
        .map_err(|e| FmDataError::Config(format!("fms.fms_url is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FmDataError::Config(format!(
            "fms.fms_url must use http or https, got {}",
            url.scheme()
        )));
    }

    if config.database.pool_size == 0 {
        return Err(FmDataError::Config("database.pool_size must be at least 1".to_string()));
    }

    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `FmDataError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FmDataError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FmDataError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FmDataError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./fmdata.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("fmdata.json"),
        dir.join("fmdata.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `FmDataError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FmDataError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric environment variable, `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| FmDataError::Config(format!("Invalid value for {key}: {e}")))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).map_or(default, |s| {
        matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const SERVER_VARS: [(&str, &str); 5] = [
        ("FMDATA_FMS_URL", "https://fms.local/fmi/rest/api/"),
        ("FMDATA_SOLUTION", "Tasks"),
        ("FMDATA_USERNAME", "admin"),
        ("FMDATA_PASSWORD", "secret"),
        ("FMDATA_AUTH_LAYOUT", "Auth"),
    ];

    const OPTIONAL_VARS: [&str; 8] = [
        "FMDATA_TIMEOUT_SECONDS",
        "FMDATA_ACCEPT_INVALID_CERTS",
        "FMDATA_USE_SYSTEM_PROXY",
        "FMDATA_VALIDATION_TTL_SECONDS",
        "FMDATA_DB_PATH",
        "FMDATA_DB_POOL_SIZE",
        "FMDATA_LOG_FILTER",
        "FMDATA_LOG_JSON",
    ];

    fn clear_env() {
        for (key, _) in SERVER_VARS {
            std::env::remove_var(key);
        }
        for key in OPTIONAL_VARS {
            std::env::remove_var(key);
        }
    }

    fn sample_config() -> Config {
        Config {
            fms: FmsConfig {
                fms_url: "https://fms.local/fmi/rest/api/".into(),
                solution: "Tasks".into(),
                username: "admin".into(),
                password: "secret".into(),
                auth_layout: "Auth".into(),
                timeout_seconds: 30,
                accept_invalid_certs: false,
                use_system_proxy: true,
                validation_ttl_seconds: 0,
            },
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for (key, value) in [("TEST_BOOL_1", "1"), ("TEST_BOOL_YES", "yes"), ("TEST_BOOL_UP", "TRUE")]
        {
            std::env::set_var(key, value);
            assert!(env_bool(key, false));
            std::env::remove_var(key);
        }

        for (key, value) in [("TEST_BOOL_0", "0"), ("TEST_BOOL_OFF", "off"), ("TEST_BOOL_NO", "no")] {
            std::env::set_var(key, value);
            assert!(!env_bool(key, true));
            std::env::remove_var(key);
        }

        std::env::remove_var("TEST_BOOL_MISSING");
        assert!(env_bool("TEST_BOOL_MISSING", true));
        assert!(!env_bool("TEST_BOOL_MISSING", false));
    }

    #[test]
    fn test_load_from_env_required_vars_only() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        for (key, value) in SERVER_VARS {
            std::env::set_var(key, value);
        }

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.fms.fms_url, "https://fms.local/fmi/rest/api/");
        assert_eq!(config.fms.auth_layout, "Auth");
        assert_eq!(config.fms.timeout_seconds, 30);
        assert!(!config.fms.accept_invalid_certs);
        assert!(config.fms.use_system_proxy);
        assert_eq!(config.database, DatabaseConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        for (key, value) in SERVER_VARS {
            std::env::set_var(key, value);
        }
        std::env::set_var("FMDATA_TIMEOUT_SECONDS", "5");
        std::env::set_var("FMDATA_ACCEPT_INVALID_CERTS", "true");
        std::env::set_var("FMDATA_USE_SYSTEM_PROXY", "off");
        std::env::set_var("FMDATA_VALIDATION_TTL_SECONDS", "60");
        std::env::set_var("FMDATA_DB_PATH", "/tmp/tokens.db");
        std::env::set_var("FMDATA_DB_POOL_SIZE", "8");
        std::env::set_var("FMDATA_LOG_FILTER", "fmdata_infra=debug");
        std::env::set_var("FMDATA_LOG_JSON", "1");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.fms.timeout_seconds, 5);
        assert!(config.fms.accept_invalid_certs);
        assert!(!config.fms.use_system_proxy);
        assert_eq!(config.fms.validation_ttl_seconds, 60);
        assert_eq!(config.database.path, "/tmp/tokens.db");
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.logging.filter, "fmdata_infra=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FMDATA_FMS_URL", "https://fms.local/");
        let result = load_from_env();
        clear_env();

        match result {
            Err(FmDataError::Config(msg)) => assert!(msg.contains("FMDATA_SOLUTION")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        for (key, value) in SERVER_VARS {
            std::env::set_var(key, value);
        }
        std::env::set_var("FMDATA_DB_POOL_SIZE", "not-a-number");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(FmDataError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_json_with_camel_case_keys() {
        let path = write_temp(
            r#"{
                "fms": {
                    "fmsUrl": "https://fms.local/fmi/rest/api/",
                    "solution": "Tasks",
                    "username": "admin",
                    "password": "secret",
                    "authLayout": "Auth"
                }
            }"#,
            "json",
        );

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config from JSON");
        assert_eq!(config.fms.fms_url, "https://fms.local/fmi/rest/api/");
        assert_eq!(config.fms.auth_layout, "Auth");
        assert_eq!(config.database.pool_size, 4);
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = write_temp(
            r#"
[fms]
fms_url = "https://fms.local/fmi/rest/api/"
solution = "Tasks"
username = "admin"
password = "secret"
auth_layout = "Auth"
validation_ttl_seconds = 30

[database]
path = "tokens.db"
pool_size = 6

[logging]
filter = "debug"
json = true
"#,
            "toml",
        );

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config from TOML");
        assert_eq!(config.fms.validation_ttl_seconds, 30);
        assert_eq!(config.database.pool_size, 6);
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(FmDataError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = write_temp(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        validate(&sample_config()).expect("valid config");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut config = sample_config();
        config.fms.auth_layout = "  ".into();

        match validate(&config) {
            Err(FmDataError::Config(msg)) => assert!(msg.contains("auth_layout")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_url_and_pool_size() {
        let mut config = sample_config();
        config.fms.fms_url = "fms.local/api".into();
        assert!(validate(&config).is_err());

        let mut config = sample_config();
        config.fms.fms_url = "ftp://fms.local/".into();
        assert!(validate(&config).is_err());

        let mut config = sample_config();
        config.database.pool_size = 0;
        assert!(validate(&config).is_err());
    }
}
