//! Server state - shared references to every service
//!
//! `ServerState` is what handlers receive from axum. Every field is
//! cheaply cloneable (`Arc` inside), so the state itself clones per
//! request without cost.

use crate::cart::CartEngine;
use crate::catalog::CatalogService;
use crate::checkout::CheckoutService;
use crate::core::{Config, Result};
use crate::session::SessionStore;
use crate::storage::Store;

/// Shared application state
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable runtime configuration |
/// | store | embedded order/catalog database |
/// | catalog | read-side lookups over the store |
/// | sessions | in-memory session map |
/// | cart | session cart mutations |
/// | checkout | order finalization |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Store,
    pub catalog: CatalogService,
    pub sessions: SessionStore,
    pub cart: CartEngine,
    pub checkout: CheckoutService,
}

impl ServerState {
    /// Open the database under the configured working directory and
    /// wire the services together
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let store = Store::open(config.database_path())?;
        Ok(Self::with_store(config.clone(), store))
    }

    /// Build state over an already-open store (tests use a temp dir)
    pub fn with_store(config: Config, store: Store) -> Self {
        let catalog = CatalogService::new(store.clone());
        let cart = CartEngine::new(catalog.clone());
        let checkout = CheckoutService::new(store.clone(), catalog.clone());
        Self {
            config,
            store,
            catalog,
            sessions: SessionStore::new(),
            cart,
            checkout,
        }
    }
}
