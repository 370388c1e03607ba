use reqwest::Method;

use fleetdesk_core::FuelId;
use fleetdesk_fleet::{FuelRecord, FuelVerification, NewFuelRecord, Vehicle};

use crate::error::ApiResult;
use crate::http::{ApiClient, Body};
use crate::store::{Collection, FetchOutcome, ResourceStore, StoreState};

const FUELS: Collection = Collection {
    name: "fuels",
    path: "/vehicle-fuels",
    fetch_failed: "Failed to fetch fuel records",
};

#[derive(Debug)]
pub struct FuelStore {
    inner: ResourceStore<FuelRecord>,
}

impl FuelStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: ResourceStore::new(api, FUELS),
        }
    }

    pub async fn snapshot(&self) -> StoreState<FuelRecord> {
        self.inner.snapshot().await
    }

    pub async fn find(&self, id: FuelId) -> Option<FuelRecord> {
        self.inner.find(id).await
    }

    pub async fn fetch_all(&self) -> FetchOutcome {
        self.inner.fetch_all().await
    }

    /// Record a fill for `vehicle`.
    ///
    /// Nothing is sent unless the odometer reading is ahead of the vehicle's
    /// current one.
    pub async fn create(&self, vehicle: &Vehicle, record: NewFuelRecord) -> ApiResult<()> {
        record.validate_against(vehicle)?;

        self.inner
            .write(
                Method::POST,
                FUELS.path,
                Body::json(&record)?,
                "Failed to add fuel record",
            )
            .await?;

        tracing::info!(vehicle_id = %record.vehicle_id, "fuel record created");
        self.inner.refresh().await;
        Ok(())
    }

    /// Flip the verification flag on the server and patch the one record.
    /// Returns the flag the server reports.
    pub async fn toggle_verification(&self, id: FuelId) -> ApiResult<bool> {
        let reply = self
            .inner
            .write(
                Method::PATCH,
                &format!("/vehicle-fuel/{id}/verify"),
                Body::Empty,
                "Failed to update fuel status",
            )
            .await?;

        let verified = match reply.json::<FuelVerification>() {
            Ok(body) => body.fuel.is_verified,
            Err(err) => return Err(self.inner.record_error(err).await),
        };
        if !self
            .inner
            .patch_item(id, |record| record.is_verified = verified)
            .await
        {
            tracing::debug!(%id, "toggled fuel record is not loaded");
        }

        tracing::info!(%id, verified, "fuel verification changed");
        Ok(verified)
    }
}
