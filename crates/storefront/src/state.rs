//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::OrderIntake;
use crate::supabase::{AuthClient, Db, StorageClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: AuthClient,
    db: Db,
    intake: OrderIntake,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let auth = AuthClient::new(&config.supabase);
        let db = Db::new(&config.supabase);
        let storage = StorageClient::new(&config.supabase);
        let intake = OrderIntake::new(db.clone(), storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                db,
                intake,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the auth service client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the table API client.
    #[must_use]
    pub fn db(&self) -> &Db {
        &self.inner.db
    }

    /// Get a reference to the order intake service.
    #[must_use]
    pub fn intake(&self) -> &OrderIntake {
        &self.inner.intake
    }
}
