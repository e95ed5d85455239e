//! Service wiring
//!
//! Builds the object graph used by applications: one database pool, one
//! token store, one session gateway, one token manager and the record
//! client that draws its tokens from that manager.

use std::sync::Arc;

use fmdata_core::TokenManager;
use fmdata_domain::{Config, Result};
use tracing::info;

use crate::api::{FmsClient, FmsSessionGateway};
use crate::config;
use crate::database::{DbManager, SqliteTokenStore};

/// Token manager backed by the SQLite store and the HTTP gateway.
pub type SqlTokenManager = TokenManager<FmsSessionGateway, SqliteTokenStore>;

/// Fully wired Data API client.
pub struct FmDataService {
    db: Arc<DbManager>,
    store: Arc<SqliteTokenStore>,
    tokens: Arc<SqlTokenManager>,
    client: FmsClient,
}

impl FmDataService {
    /// Validate `config`, open the token database and build the clients.
    ///
    /// No request is sent to the server here; the first session is created
    /// lazily by the first operation that needs a token.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the database cannot
    /// be opened or migrated
    pub fn connect(config: &Config) -> Result<Self> {
        config::validate(config)?;

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let store = Arc::new(SqliteTokenStore::new(Arc::clone(&db)));
        let gateway = Arc::new(FmsSessionGateway::from_config(&config.fms)?);
        let tokens = Arc::new(
            TokenManager::new(gateway, Arc::clone(&store))
                .with_validation_ttl(config.fms.validation_ttl()),
        );
        let client = FmsClient::new(&config.fms, Arc::<SqlTokenManager>::clone(&tokens))?;

        info!(
            solution = %config.fms.solution,
            db_path = %db.path().display(),
            "fmdata service ready"
        );

        Ok(Self { db, store, tokens, client })
    }

    /// Record operations.
    #[must_use]
    pub const fn client(&self) -> &FmsClient {
        &self.client
    }

    /// Shared token manager.
    #[must_use]
    pub const fn token_manager(&self) -> &Arc<SqlTokenManager> {
        &self.tokens
    }

    #[must_use]
    pub const fn token_store(&self) -> &Arc<SqliteTokenStore> {
        &self.store
    }

    #[must_use]
    pub const fn database(&self) -> &Arc<DbManager> {
        &self.db
    }
}
