//! Decoding of Data API response bodies.
//!
//! Every response is a JSON object carrying an `errorCode` next to the
//! payload. A non-2xx status or a non-zero `errorCode` turns the whole body
//! into [`ApiError::Remote`].

use fmdata_domain::{FmsErrorCode, Record, RecordAck, RemoteError};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::errors::ApiError;

/// Read the body of `response` and check it for a remote error.
pub(super) async fn read_envelope(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;

    check_envelope(status.as_u16(), &text)
}

/// Status + raw body to payload or remote error.
pub(super) fn check_envelope(status: u16, text: &str) -> Result<Value, ApiError> {
    let body = parse_body(text);

    let remote = RemoteError::from_body(status, body);
    let failed = !(200..300).contains(&status) || remote.code.is_some_and(FmsErrorCode::is_error);
    if failed {
        debug!(status, code = ?remote.code, "remote error response");
        return Err(ApiError::Remote(remote));
    }

    Ok(remote.body)
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// The `data` array of a read or find response.
pub(super) fn records(body: Value) -> Result<Vec<Record>, ApiError> {
    match body {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| ApiError::Protocol("response has no data array".into()))
            .and_then(|data| decode(data, "data")),
        other => Err(ApiError::Protocol(format!("expected a JSON object, got {other}"))),
    }
}

/// Acknowledgement fields of a write response.
pub(super) fn ack(body: Value) -> Result<RecordAck, ApiError> {
    if body.is_null() {
        return Ok(RecordAck::default());
    }
    decode(body, "acknowledgement")
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Protocol(format!("invalid {what}: {e}")))
}
