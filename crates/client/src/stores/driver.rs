use reqwest::Method;

use fleetdesk_core::UserId;
use fleetdesk_parties::{DriverDraft, User};

use crate::error::ApiResult;
use crate::http::{ApiClient, Body};
use crate::store::{Collection, FetchOutcome, ResourceStore, StoreState};

const DRIVERS: Collection = Collection {
    name: "drivers",
    path: "/user/drivers",
    fetch_failed: "Failed to fetch drivers",
};

const CREATE_DRIVER: &str = "/driver/create-driver";

#[derive(Debug)]
pub struct DriverStore {
    inner: ResourceStore<User>,
}

impl DriverStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: ResourceStore::new(api, DRIVERS),
        }
    }

    pub async fn snapshot(&self) -> StoreState<User> {
        self.inner.snapshot().await
    }

    pub async fn find(&self, id: UserId) -> Option<User> {
        self.inner.find(id).await
    }

    pub async fn fetch_all(&self) -> FetchOutcome {
        self.inner.fetch_all().await
    }

    /// Create a driver account with its documents, then refetch the list.
    pub async fn create(&self, draft: DriverDraft) -> ApiResult<()> {
        let driver = draft.complete()?;

        self.inner
            .write(
                Method::POST,
                CREATE_DRIVER,
                Body::Form(driver.into_form_data()),
                "Failed to create driver",
            )
            .await?;

        tracing::info!("driver created");
        self.inner.refresh().await;
        Ok(())
    }
}
