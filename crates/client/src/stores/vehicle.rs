use reqwest::Method;

use fleetdesk_core::VehicleId;
use fleetdesk_fleet::{Vehicle, VehicleForm};

use crate::error::ApiResult;
use crate::http::{ApiClient, Body};
use crate::store::{Collection, FetchOutcome, ResourceStore, StoreState};

const VEHICLES: Collection = Collection {
    name: "vehicles",
    path: "/vehicles",
    fetch_failed: "Failed to fetch vehicles",
};

#[derive(Debug)]
pub struct VehicleStore {
    inner: ResourceStore<Vehicle>,
}

impl VehicleStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: ResourceStore::new(api, VEHICLES),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Vehicle> {
        self.inner.snapshot().await
    }

    pub async fn find(&self, id: VehicleId) -> Option<Vehicle> {
        self.inner.find(id).await
    }

    pub async fn fetch_all(&self) -> FetchOutcome {
        self.inner.fetch_all().await
    }

    pub async fn fetch_one(&self, id: VehicleId) -> ApiResult<Vehicle> {
        self.inner.fetch_one(id, "Failed to fetch vehicle").await
    }

    /// Submit a new vehicle, append the server's copy, then refetch.
    pub async fn create(&self, form: VehicleForm) -> ApiResult<Option<Vehicle>> {
        form.validate_for_create()?;

        let reply = self
            .inner
            .write(
                Method::POST,
                VEHICLES.path,
                Body::Form(form.into_form_data()),
                "Failed to add vehicle",
            )
            .await?;

        let created = match reply.json::<Vehicle>() {
            Ok(vehicle) => {
                tracing::info!(id = %vehicle.id, "vehicle created");
                self.inner.append(vehicle.clone()).await;
                Some(vehicle)
            }
            Err(err) => {
                tracing::debug!(error = %err, "create reply carried no vehicle");
                None
            }
        };

        self.inner.refresh().await;
        Ok(created)
    }

    /// Edit a vehicle. When it is loaded, the odometer is checked against
    /// the known reading first.
    pub async fn update(&self, id: VehicleId, form: VehicleForm) -> ApiResult<()> {
        if let Some(current) = self.inner.find(id).await {
            form.validate_for_update(&current)?;
        }

        self.inner
            .write(
                Method::PUT,
                &format!("{}/{id}", VEHICLES.path),
                Body::Form(form.into_form_data()),
                "Failed to update vehicle",
            )
            .await?;

        tracing::info!(%id, "vehicle updated");
        self.inner.refresh().await;
        Ok(())
    }

    /// Delete on the server, then drop the local copy.
    pub async fn remove(&self, id: VehicleId) -> ApiResult<()> {
        self.inner
            .write(
                Method::DELETE,
                &format!("{}/{id}", VEHICLES.path),
                Body::Empty,
                "Failed to delete vehicle",
            )
            .await?;

        self.inner.remove_item(id).await;
        tracing::info!(%id, "vehicle removed");
        Ok(())
    }
}
