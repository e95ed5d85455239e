//! In-memory doubles for `TokenStore` and `SessionGateway`.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fmdata_core::auth::{SessionGateway, SessionProbe, TokenStore};
use fmdata_domain::{FmDataError, Result as DomainResult, TokenRecord};

/// Append-only token store kept in a vector.
///
/// Reads and writes can be switched to fail to simulate an unavailable store.
#[derive(Default)]
pub struct MockTokenStore {
    records: Mutex<Vec<TokenRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    inserts: AtomicUsize,
}

impl MockTokenStore {
    /// Create a store seeded with the given tokens, oldest first.
    pub fn seeded(tokens: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut records = store.records.lock().unwrap();
            for (index, token) in tokens.iter().enumerate() {
                let offset = i64::try_from(index).unwrap();
                records.push(TokenRecord {
                    id: offset + 1,
                    token: (*token).to_string(),
                    created_at: 1_700_000_000 + offset,
                });
            }
        }
        store
    }

    pub fn failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// All stored tokens in insertion order.
    pub fn tokens(&self) -> Vec<String> {
        self.records.lock().unwrap().iter().map(|r| r.token.clone()).collect()
    }

    /// Number of successful inserts performed through the port.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn find_latest(&self) -> DomainResult<Option<TokenRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FmDataError::Database("store offline".into()));
        }
        Ok(self.records.lock().unwrap().last().cloned())
    }

    async fn insert(&self, token: &str) -> DomainResult<TokenRecord> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FmDataError::Database("store offline".into()));
        }
        let mut records = self.records.lock().unwrap();
        let record = TokenRecord {
            id: i64::try_from(records.len()).unwrap() + 1,
            token: token.to_string(),
            created_at: 1_800_000_000,
        };
        records.push(record.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }
}

/// Scripted session endpoints.
///
/// `create_session` hands out the queued tokens in order; `probe_session`
/// reports tokens marked invalid as [`SessionProbe::Invalid`].
#[derive(Default)]
pub struct MockSessionGateway {
    issued: Mutex<VecDeque<String>>,
    invalid: Mutex<HashSet<String>>,
    probed: Mutex<Vec<String>>,
    creates: AtomicUsize,
    probe_unreachable: AtomicBool,
    create_delay: Option<Duration>,
}

impl MockSessionGateway {
    /// Gateway that issues `tokens` in order, then rejects credentials.
    pub fn issuing(tokens: &[&str]) -> Self {
        Self {
            issued: Mutex::new(tokens.iter().map(|t| (*t).to_string()).collect()),
            ..Self::default()
        }
    }

    /// Mark `token` as rejected by the server (code 952).
    pub fn with_invalid(self, token: &str) -> Self {
        self.invalid.lock().unwrap().insert(token.to_string());
        self
    }

    /// Make every probe fail as if the server were unreachable.
    pub fn with_unreachable_probe(self) -> Self {
        self.probe_unreachable.store(true, Ordering::SeqCst);
        self
    }

    /// Delay session creation to widen race windows.
    pub const fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Mark `token` as rejected from now on.
    pub fn reject(&self, token: &str) {
        self.invalid.lock().unwrap().insert(token.to_string());
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn probed_tokens(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionGateway for MockSessionGateway {
    async fn create_session(&self) -> DomainResult<String> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        self.issued
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| FmDataError::Auth("errorCode 212: invalid account or password".into()))
    }

    async fn probe_session(&self, token: &str) -> DomainResult<SessionProbe> {
        self.probed.lock().unwrap().push(token.to_string());
        if self.probe_unreachable.load(Ordering::SeqCst) {
            return Err(FmDataError::Network("HTTP connection failure".into()));
        }
        if self.invalid.lock().unwrap().contains(token) {
            Ok(SessionProbe::Invalid)
        } else {
            Ok(SessionProbe::Accepted)
        }
    }
}
