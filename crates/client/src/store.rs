//! Generic resource store: one remote collection mirrored in memory.
//!
//! Contract shared by every entity store:
//!
//! - `fetch_all` replaces `items` wholesale on success and leaves them alone
//!   on failure, recording the message in `error` instead of returning it.
//! - Writes are write-then-refresh: a successful create or update is always
//!   followed by `fetch_all`. A failed write records `error` and is also
//!   returned to the caller.
//! - Overlapping `fetch_all` calls are sequenced. Only the most recently
//!   issued one may touch `items` or `error`; older responses are dropped.
//! - `loading` stays raised while any fetch or write is in flight.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use fleetdesk_core::Entity;

use crate::error::{ApiError, ApiResult};
use crate::http::{Access, ApiClient, Body, Reply};

/// Static description of one remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    /// Used in logs.
    pub name: &'static str,
    /// List endpoint; single items live at `{path}/{id}`.
    pub path: &'static str,
    pub fetch_failed: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    /// Server order.
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// What a `fetch_all` call did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was issued while this one was in flight.
    Superseded,
}

pub struct ResourceStore<T> {
    api: ApiClient,
    collection: Collection,
    state: RwLock<StoreState<T>>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

impl<T> ResourceStore<T>
where
    T: Entity + DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(api: ApiClient, collection: Collection) -> Self {
        Self {
            api,
            collection,
            state: RwLock::new(StoreState::default()),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn snapshot(&self) -> StoreState<T> {
        self.state.read().await.clone()
    }

    pub async fn find(&self, id: T::Id) -> Option<T> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub async fn fetch_all(&self) -> FetchOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin().await;

        let result = self
            .api
            .get(self.collection.path, self.collection.fetch_failed)
            .await
            .and_then(|reply| reply.json::<Vec<T>>());

        let mut state = self.state.write().await;
        self.settle(&mut state);
        if self.issued.load(Ordering::SeqCst) != ticket {
            tracing::debug!(
                collection = self.collection.name,
                ticket,
                "dropping superseded fetch response"
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(items) => {
                tracing::debug!(
                    collection = self.collection.name,
                    count = items.len(),
                    "collection refreshed"
                );
                state.items = items;
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(
                    collection = self.collection.name,
                    error = %err,
                    "collection fetch failed; keeping previous items"
                );
                state.error = Some(err.message());
                FetchOutcome::Failed
            }
        }
    }

    /// `GET {path}/{id}`. Never touches the store's state.
    pub async fn fetch_one(&self, id: T::Id, failure: &str) -> ApiResult<T> {
        let path = format!("{}/{id}", self.collection.path);
        self.api.get(&path, failure).await?.json()
    }

    /// Issue a write against the collection's API.
    ///
    /// Clears `error` and raises `loading` for the duration of the request.
    /// On failure the message is recorded and the error handed back.
    pub async fn write(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Body,
        failure: &str,
    ) -> ApiResult<Reply> {
        self.begin().await;

        let result = self
            .api
            .send(method, path, Access::Bearer, body, failure)
            .await;

        let mut state = self.state.write().await;
        self.settle(&mut state);
        if let Err(err) = &result {
            state.error = Some(err.message());
        }
        result
    }

    /// Record a failure detected after the request itself succeeded, such as
    /// a reply that does not decode. Hands the error back for `?`.
    pub async fn record_error(&self, err: ApiError) -> ApiError {
        tracing::warn!(
            collection = self.collection.name,
            error = %err,
            "write reply rejected"
        );
        self.state.write().await.error = Some(err.message());
        err
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        state.loading = true;
        state.error = None;
    }

    /// Must be called with the state lock held, once per `begin`.
    fn settle(&self, state: &mut StoreState<T>) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        state.loading = remaining > 0;
    }

    /// Re-read the whole collection after a successful write.
    pub async fn refresh(&self) {
        if self.fetch_all().await == FetchOutcome::Failed {
            tracing::warn!(
                collection = self.collection.name,
                "refresh after write failed"
            );
        }
    }

    /// Optimistically add a server-returned record. A record whose id is
    /// already present is not added twice.
    pub async fn append(&self, item: T) {
        let mut state = self.state.write().await;
        if !state.items.iter().any(|existing| existing.id() == item.id()) {
            state.items.push(item);
        }
    }

    /// Apply `patch` to the record with `id`. Returns whether it was found.
    pub async fn patch_item(&self, id: T::Id, patch: impl FnOnce(&mut T)) -> bool {
        let mut state = self.state.write().await;
        match state.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    pub async fn remove_item(&self, id: T::Id) -> bool {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|item| item.id() != id);
        state.items.len() != before
    }

    pub async fn clear(&self) {
        *self.state.write().await = StoreState::default();
    }
}

impl<T> core::fmt::Debug for ResourceStore<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("collection", &self.collection.name)
            .field("issued", &self.issued.load(Ordering::Relaxed))
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}
