use reqwest::Method;

use fleetdesk_core::BunkId;
use fleetdesk_parties::{Bunk, NewBunk};

use crate::error::ApiResult;
use crate::http::{ApiClient, Body};
use crate::store::{Collection, FetchOutcome, ResourceStore, StoreState};

const BUNKS: Collection = Collection {
    name: "bunks",
    path: "/bunks",
    fetch_failed: "Failed to fetch bunks",
};

#[derive(Debug)]
pub struct BunkStore {
    inner: ResourceStore<Bunk>,
}

impl BunkStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: ResourceStore::new(api, BUNKS),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Bunk> {
        self.inner.snapshot().await
    }

    pub async fn find(&self, id: BunkId) -> Option<Bunk> {
        self.inner.find(id).await
    }

    pub async fn fetch_all(&self) -> FetchOutcome {
        self.inner.fetch_all().await
    }

    pub async fn create(&self, bunk: NewBunk) -> ApiResult<()> {
        bunk.validate()?;

        self.inner
            .write(
                Method::POST,
                BUNKS.path,
                Body::json(&bunk)?,
                "Failed to create bunk",
            )
            .await?;

        tracing::info!(name = %bunk.bunk_name, "bunk created");
        self.inner.refresh().await;
        Ok(())
    }
}
