//! Bearer credential lifecycle.
//!
//! At most one token is live per session. The in-memory copy is what every
//! request reads; the [`TokenStore`] keeps it across restarts.

use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use thiserror::Error;

/// Fixed key the token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Durable key/value storage for the session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    async fn load(&self) -> anyhow::Result<Option<String>>;

    /// Persist `token`, or remove the persisted value when `None`.
    async fn save(&self, token: Option<&str>) -> anyhow::Result<()>;
}

/// Process-local token store. Survives nothing; used for tests and for
/// sessions that must not touch disk.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    async fn save(&self, token: Option<&str>) -> anyhow::Result<()> {
        *self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token.map(str::to_string);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read stored credential: {0}")]
    Load(String),
    #[error("failed to persist credential: {0}")]
    Persist(String),
}

/// Owner of the bearer token.
///
/// Cheap to share behind an `Arc`; every store holds the same instance so a
/// login or logout is visible to the next request anywhere in the client.
pub struct CredentialProvider {
    current: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl core::fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl CredentialProvider {
    /// Build a provider seeded from durable storage.
    pub async fn restore(store: Arc<dyn TokenStore>) -> Result<Self, CredentialError> {
        let token = store
            .load()
            .await
            .map_err(|e| CredentialError::Load(format!("{e:#}")))?
            .filter(|t| !t.is_empty());

        tracing::debug!(authenticated = token.is_some(), "restored session credential");

        Ok(Self {
            current: RwLock::new(token),
            store,
        })
    }

    /// A provider with no token, backed by [`MemoryTokenStore`].
    pub fn ephemeral() -> Self {
        Self {
            current: RwLock::new(None),
            store: Arc::new(MemoryTokenStore::new()),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Replace the token. `None` (or an empty string) clears it.
    ///
    /// The in-memory value changes before persistence is attempted, so the
    /// new state applies to the very next request even if the write fails.
    pub async fn set(&self, token: Option<String>) -> Result<(), CredentialError> {
        let token = token.filter(|t| !t.is_empty());

        {
            let mut guard = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = token.clone();
        }

        self.store
            .save(token.as_deref())
            .await
            .map_err(|e| CredentialError::Persist(format!("{e:#}")))?;

        if token.is_some() {
            tracing::info!("session credential stored");
        } else {
            tracing::info!("session credential cleared");
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), CredentialError> {
        self.set(None).await
    }

    /// Value for the `Authorization` header, `None` when signed out.
    pub fn authorization_header(&self) -> Option<String> {
        self.get().map(|t| format!("Bearer {t}"))
    }
}
