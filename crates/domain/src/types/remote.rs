//! Error payloads returned by the FileMaker Data API.
//!
//! The server reports `errorCode` as a JSON string on some versions and as a
//! number on others, so codes are decoded into [`FmsErrorCode`] from either
//! representation and always compared as typed values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data API error codes the client reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawErrorCode", into = "i32")]
pub enum FmsErrorCode {
    /// `0`: request succeeded.
    Ok,
    /// `101`: record is missing.
    RecordMissing,
    /// `102`: field is missing.
    FieldMissing,
    /// `105`: layout is missing.
    LayoutMissing,
    /// `212`: invalid user account and/or password.
    InvalidCredentials,
    /// `401`: no records match the request.
    NoRecordsMatch,
    /// `952`: the session token is invalid or expired.
    InvalidToken,
    /// Any code without a dedicated variant, including `-1` (unknown error).
    Other(i32),
}

impl FmsErrorCode {
    /// Map a numeric code onto the enumeration.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            101 => Self::RecordMissing,
            102 => Self::FieldMissing,
            105 => Self::LayoutMissing,
            212 => Self::InvalidCredentials,
            401 => Self::NoRecordsMatch,
            952 => Self::InvalidToken,
            other => Self::Other(other),
        }
    }

    /// Numeric value as sent by the server.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::RecordMissing => 101,
            Self::FieldMissing => 102,
            Self::LayoutMissing => 105,
            Self::InvalidCredentials => 212,
            Self::NoRecordsMatch => 401,
            Self::InvalidToken => 952,
            Self::Other(code) => code,
        }
    }

    /// `true` for every code except `0`.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::Ok)
    }
}

impl From<FmsErrorCode> for i32 {
    fn from(code: FmsErrorCode) -> Self {
        code.as_i32()
    }
}

impl fmt::Display for FmsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawErrorCode {
    Number(i32),
    Text(String),
}

impl TryFrom<RawErrorCode> for FmsErrorCode {
    type Error = String;

    fn try_from(raw: RawErrorCode) -> Result<Self, Self::Error> {
        match raw {
            RawErrorCode::Number(code) => Ok(Self::from_code(code)),
            RawErrorCode::Text(text) => text
                .trim()
                .parse::<i32>()
                .map(Self::from_code)
                .map_err(|e| format!("invalid errorCode {text:?}: {e}")),
        }
    }
}

/// Error body returned by the Data API, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    /// HTTP status of the response.
    pub status: u16,
    /// Decoded `errorCode`, when the body carried one.
    pub code: Option<FmsErrorCode>,
    /// Human readable `result` / `message` text, when present.
    pub message: Option<String>,
    /// The complete response body.
    pub body: Value,
}

impl RemoteError {
    /// Build a remote error from an HTTP status and a response body.
    ///
    /// Non-JSON bodies are kept as a JSON string.
    #[must_use]
    pub fn from_body(status: u16, body: Value) -> Self {
        let code = body
            .get("errorCode")
            .cloned()
            .and_then(|raw| serde_json::from_value::<FmsErrorCode>(raw).ok());
        let message = ["result", "message", "errorMessage"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(ToOwned::to_owned);

        Self { status, code, message, body }
    }

    /// `true` when the server rejected the session token (code 952).
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        self.code == Some(FmsErrorCode::InvalidToken)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(code) = self.code {
            write!(f, ", errorCode {code}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}
