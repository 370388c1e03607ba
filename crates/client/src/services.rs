//! Service container built once at startup and shared with every view.

use std::sync::Arc;

use fleetdesk_auth::{AccessGuard, CredentialProvider, RouteDecision};

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::stores::{BunkStore, DriverStore, FuelStore, UserStore, VehicleStore};
use crate::token_store::SqliteTokenStore;

/// All stores share one [`ApiClient`] and therefore one credential.
#[derive(Debug, Clone)]
pub struct Services {
    pub config: Arc<ClientConfig>,
    pub credentials: Arc<CredentialProvider>,
    pub guard: AccessGuard,
    pub vehicles: Arc<VehicleStore>,
    pub fuels: Arc<FuelStore>,
    pub bunks: Arc<BunkStore>,
    pub drivers: Arc<DriverStore>,
    pub users: Arc<UserStore>,
}

impl Services {
    pub fn new(config: ClientConfig, credentials: Arc<CredentialProvider>) -> ApiResult<Self> {
        let api = ApiClient::new(&config, credentials.clone())?;

        Ok(Self {
            config: Arc::new(config),
            guard: AccessGuard::new(credentials.clone()),
            credentials,
            vehicles: Arc::new(VehicleStore::new(api.clone())),
            fuels: Arc::new(FuelStore::new(api.clone())),
            bunks: Arc::new(BunkStore::new(api.clone())),
            drivers: Arc::new(DriverStore::new(api.clone())),
            users: Arc::new(UserStore::new(api)),
        })
    }

    /// Restore the persisted session from the SQLite token file named in
    /// `config`, then build the stores.
    pub async fn open(config: ClientConfig) -> ApiResult<Self> {
        let store = Arc::new(SqliteTokenStore::new(config.token_db_path.clone()));
        let credentials = Arc::new(CredentialProvider::restore(store).await?);
        tracing::info!(
            api_url = %config.api_url,
            authenticated = credentials.is_authenticated(),
            "client services ready"
        );
        Self::new(config, credentials)
    }

    /// Route decision for `path` given the current credential and profile.
    pub async fn route(&self, path: &str) -> RouteDecision {
        let session = self.users.session().await;
        self.guard.decide(path, session.profile_failed)
    }

    /// Absolute URL of a stored document image.
    pub fn document_url(&self, path: Option<&str>) -> Option<String> {
        self.config.file_url(path)
    }
}
