#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fmdata_domain::{Config, DatabaseConfig, FmsConfig, LoggingConfig};
use fmdata_infra::database::DbManager;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/fmi/rest/api";
pub const SOLUTION: &str = "Tasks";
pub const AUTH_LAYOUT: &str = "Auth";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new migrated temporary database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = temp_dir.path().join("fmstoken.db");

        let manager = DbManager::new(&path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), path, _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration pointing at `server` and the database file at `db_path`.
pub fn test_config(server: &MockServer, db_path: &Path) -> Config {
    Config {
        fms: FmsConfig {
            fms_url: format!("{}{API_PREFIX}/", server.uri()),
            solution: SOLUTION.into(),
            username: "admin".into(),
            password: "secret".into(),
            auth_layout: AUTH_LAYOUT.into(),
            timeout_seconds: 5,
            accept_invalid_certs: false,
            use_system_proxy: false,
            validation_ttl_seconds: 0,
        },
        database: DatabaseConfig { path: db_path.display().to_string(), pool_size: 2 },
        logging: LoggingConfig::default(),
    }
}

pub fn record_path(layout: &str) -> String {
    format!("{API_PREFIX}/record/{SOLUTION}/{layout}")
}

pub fn ok_body(payload: Value) -> ResponseTemplate {
    let mut body = json!({ "errorCode": "0", "result": "OK" });
    if let (Some(target), Value::Object(extra)) = (body.as_object_mut(), payload) {
        target.extend(extra);
    }
    ResponseTemplate::new(200).set_body_json(body)
}

/// `POST auth/{solution}` answering with `token`, expected `times` times.
pub async fn mount_session(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("{API_PREFIX}/auth/{SOLUTION}")))
        .respond_with(ok_body(json!({ "token": token })))
        .expect(times)
        .mount(server)
        .await;
}

/// Probe of `token` against the auth layout, answered as a valid session.
pub async fn mount_valid_probe(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path(record_path(AUTH_LAYOUT)))
        .and(query_param("range", "1"))
        .and(header("fm-data-token", token))
        .respond_with(ok_body(json!({ "data": [] })))
        .mount(server)
        .await;
}

/// Probe of `token` against the auth layout, answered with code 952.
pub async fn mount_invalid_probe(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path(record_path(AUTH_LAYOUT)))
        .and(header("fm-data-token", token))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "errorCode": "952", "result": "Invalid FileMaker Data API token" })),
        )
        .expect(1)
        .mount(server)
        .await;
}
