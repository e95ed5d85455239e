//! Session token records.

use serde::{Deserialize, Serialize};

/// A persisted session token.
///
/// Records are append-only: the current token is always the one with the
/// highest `id`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Insertion order assigned by the store.
    pub id: i64,
    pub token: String,
    /// Unix timestamp (seconds) of insertion.
    pub created_at: i64,
}

impl TokenRecord {
    /// `true` when the stored value can be presented to the server.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("id", &self.id)
            .field("token", &crate::utils::redact(&self.token))
            .field("created_at", &self.created_at)
            .finish()
    }
}
