use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fleetdesk_core::date;
use fleetdesk_core::{BunkId, DomainError, DomainResult, Entity, FuelId, VehicleId};

use crate::vehicle::Vehicle;

/// Fuel record as returned by `GET /vehicle-fuels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    #[serde(rename = "fuelId")]
    pub id: FuelId,
    pub vehicle_id: VehicleId,
    pub bunk_id: BunkId,
    pub volume: f64,
    pub amount: f64,
    #[serde(with = "date::required")]
    pub date: NaiveDate,
    /// Odometer reading at fill time.
    pub kilometer: i64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<FuelVehicleRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bunk: Option<FuelBunkRef>,
}

/// Vehicle summary embedded in a fuel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelVehicleRef {
    pub id: VehicleId,
    pub vehicle_name: String,
    pub vehicle_number: String,
}

/// Bunk summary embedded in a fuel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelBunkRef {
    pub id: BunkId,
    pub bunk_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    NotVerified,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::NotVerified => "not_verified",
        }
    }
}

impl FuelRecord {
    pub fn status(&self) -> VerificationStatus {
        if self.is_verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::NotVerified
        }
    }

    /// Plate number of the fuelled vehicle, when the API embedded it.
    pub fn vehicle_number(&self) -> Option<&str> {
        self.vehicle.as_ref().map(|v| v.vehicle_number.as_str())
    }
}

impl Entity for FuelRecord {
    type Id = FuelId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Response body of `PATCH /vehicle-fuel/:id/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelVerification {
    pub fuel: VerificationFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFlag {
    pub is_verified: bool,
}

/// Body of `POST /vehicle-fuels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFuelRecord {
    pub vehicle_id: VehicleId,
    pub bunk_id: BunkId,
    pub volume: f64,
    pub amount: f64,
    #[serde(with = "date::required")]
    pub date: NaiveDate,
    pub kilometer: i64,
}

impl NewFuelRecord {
    /// Check this fill against the vehicle it is recorded for.
    ///
    /// The odometer must be strictly ahead of the vehicle's last known
    /// reading. The server re-checks; this only keeps bad submissions local.
    pub fn validate_against(&self, vehicle: &Vehicle) -> DomainResult<()> {
        if self.vehicle_id != vehicle.id {
            return Err(DomainError::validation(format!(
                "Fuel record is for vehicle {} but vehicle {} was given",
                self.vehicle_id, vehicle.id
            )));
        }
        if !(self.volume > 0.0) {
            return Err(DomainError::validation("Volume must be greater than zero"));
        }
        if !(self.amount > 0.0) {
            return Err(DomainError::validation("Amount must be greater than zero"));
        }
        if self.kilometer <= vehicle.kilometer {
            return Err(DomainError::invariant(format!(
                "Kilometer must be greater than current reading ({})",
                vehicle.kilometer
            )));
        }
        Ok(())
    }
}

/// Add-fuel form as collected from the user; every field starts empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelDraft {
    pub vehicle_id: Option<VehicleId>,
    pub bunk_id: Option<BunkId>,
    pub volume: Option<f64>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub kilometer: Option<i64>,
}

impl FuelDraft {
    pub fn complete(self) -> DomainResult<NewFuelRecord> {
        match self {
            FuelDraft {
                vehicle_id: Some(vehicle_id),
                bunk_id: Some(bunk_id),
                volume: Some(volume),
                amount: Some(amount),
                date: Some(date),
                kilometer: Some(kilometer),
            } => Ok(NewFuelRecord {
                vehicle_id,
                bunk_id,
                volume,
                amount,
                date,
                kilometer,
            }),
            _ => Err(DomainError::validation("Please fill all fields")),
        }
    }
}
