//! Conversions from external infrastructure errors into domain errors.

use fmdata_domain::FmDataError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FmDataError);

impl From<InfraError> for FmDataError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FmDataError> for InfraError {
    fn from(value: FmDataError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFmDataError {
    fn into_fmdata(self) -> FmDataError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → FmDataError */
/* -------------------------------------------------------------------------- */

impl IntoFmDataError for SqlError {
    fn into_fmdata(self) -> FmDataError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => FmDataError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => FmDataError::Database("database is locked".into()),
                    ErrorCode::ReadOnly => FmDataError::Database("database is read-only".into()),
                    ErrorCode::CannotOpen => {
                        FmDataError::Database(format!("unable to open database file: {message}"))
                    }
                    code => FmDataError::Database(format!(
                        "sqlite failure {code:?} (code {}): {message}",
                        err.extended_code
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                FmDataError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                FmDataError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => FmDataError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => FmDataError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_fmdata())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → FmDataError */
/* -------------------------------------------------------------------------- */

impl IntoFmDataError for r2d2::Error {
    fn into_fmdata(self) -> FmDataError {
        FmDataError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        Self(value.into_fmdata())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FmDataError */
/* -------------------------------------------------------------------------- */

impl IntoFmDataError for HttpError {
    fn into_fmdata(self) -> FmDataError {
        if self.is_timeout() {
            return FmDataError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return FmDataError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return FmDataError::Config(format!("invalid HTTP request: {self}"));
        }

        FmDataError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_fmdata())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
