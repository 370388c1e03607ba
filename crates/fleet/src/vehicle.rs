use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use fleetdesk_core::date;
use fleetdesk_core::{DomainError, DomainResult, Entity, FormData, Upload, VehicleId};

/// Vehicle as returned by `GET /vehicles` and `GET /vehicles/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub vehicle_name: String,
    pub vehicle_number: String,

    /// Insurance expiry.
    #[serde(with = "date::optional", default)]
    pub insurance: Option<NaiveDate>,
    /// Pollution-under-control certificate expiry.
    #[serde(with = "date::optional", default)]
    pub pollution: Option<NaiveDate>,
    /// Registration certificate expiry.
    #[serde(with = "date::optional", default)]
    pub rc_date: Option<NaiveDate>,

    /// Last known odometer reading; only ever moves forward.
    pub kilometer: i64,
    #[serde(default)]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rc_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pollution_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_image: Option<String>,
}

/// Derived compliance status shown in the vehicle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Active,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "Active",
            VehicleStatus::Inactive => "Inactive",
        }
    }
}

impl core::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five document images a vehicle can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleDocument {
    Photo,
    RegistrationCertificate,
    Insurance,
    Pollution,
    Speedometer,
}

impl VehicleDocument {
    pub const ALL: [VehicleDocument; 5] = [
        VehicleDocument::Photo,
        VehicleDocument::RegistrationCertificate,
        VehicleDocument::Insurance,
        VehicleDocument::Pollution,
        VehicleDocument::Speedometer,
    ];

    /// Multipart field name used on upload.
    pub fn field_name(&self) -> &'static str {
        match self {
            VehicleDocument::Photo => "vehicleImage",
            VehicleDocument::RegistrationCertificate => "rcImage",
            VehicleDocument::Insurance => "insuranceImage",
            VehicleDocument::Pollution => "pollutionImage",
            VehicleDocument::Speedometer => "speedImage",
        }
    }
}

impl Vehicle {
    /// Status as of `today`.
    ///
    /// Active only when all three expiry dates are present and none of them
    /// lies before `today`. A document expiring today still counts.
    pub fn status_on(&self, today: NaiveDate) -> VehicleStatus {
        let dates = [self.insurance, self.pollution, self.rc_date];
        let all_valid = dates
            .iter()
            .all(|d| matches!(d, Some(expiry) if *expiry >= today));

        if all_valid {
            VehicleStatus::Active
        } else {
            VehicleStatus::Inactive
        }
    }

    /// Status as of the local calendar date.
    pub fn status(&self) -> VehicleStatus {
        self.status_on(Local::now().date_naive())
    }

    /// Server-relative path of a document image, if uploaded.
    pub fn document(&self, kind: VehicleDocument) -> Option<&str> {
        let path = match kind {
            VehicleDocument::Photo => &self.vehicle_image,
            VehicleDocument::RegistrationCertificate => &self.rc_image,
            VehicleDocument::Insurance => &self.insurance_image,
            VehicleDocument::Pollution => &self.pollution_image,
            VehicleDocument::Speedometer => &self.speed_image,
        };
        path.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Documents that have been uploaded, in display order.
    pub fn documents(&self) -> impl Iterator<Item = (VehicleDocument, &str)> + '_ {
        VehicleDocument::ALL
            .into_iter()
            .filter_map(move |kind| self.document(kind).map(|p| (kind, p)))
    }
}

impl Entity for Vehicle {
    type Id = VehicleId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Add/edit vehicle form. Every field is optional so the same form serves
/// full creation and partial edits; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleForm {
    pub vehicle_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub insurance: Option<NaiveDate>,
    pub pollution: Option<NaiveDate>,
    pub rc_date: Option<NaiveDate>,
    pub kilometer: Option<i64>,
    pub vehicle_image: Option<Upload>,
    pub rc_image: Option<Upload>,
    pub insurance_image: Option<Upload>,
    pub pollution_image: Option<Upload>,
    pub speed_image: Option<Upload>,
}

impl VehicleForm {
    /// Checks required for a brand-new vehicle.
    pub fn validate_for_create(&self) -> DomainResult<()> {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());

        if blank(&self.vehicle_name) {
            return Err(DomainError::validation("Vehicle name is required"));
        }
        if blank(&self.vehicle_number) {
            return Err(DomainError::validation("Vehicle number is required"));
        }
        match self.kilometer {
            None => Err(DomainError::validation("Kilometer reading is required")),
            Some(km) if km < 0 => Err(DomainError::validation(
                "Kilometer reading cannot be negative",
            )),
            Some(_) => Ok(()),
        }
    }

    /// Checks for an edit of `current`: the odometer can't go backwards.
    pub fn validate_for_update(&self, current: &Vehicle) -> DomainResult<()> {
        if let Some(km) = self.kilometer {
            if km < current.kilometer {
                return Err(DomainError::invariant(format!(
                    "Kilometer cannot be lower than current reading ({})",
                    current.kilometer
                )));
            }
        }
        Ok(())
    }

    pub fn into_form_data(self) -> FormData {
        FormData::new()
            .text_opt("vehicleName", self.vehicle_name)
            .text_opt("vehicleNumber", self.vehicle_number)
            .text_opt("insurance", self.insurance.map(date::format_wire_date))
            .text_opt("pollution", self.pollution.map(date::format_wire_date))
            .text_opt("rcDate", self.rc_date.map(date::format_wire_date))
            .text_opt("kilometer", self.kilometer)
            .file_opt(VehicleDocument::Photo.field_name(), self.vehicle_image)
            .file_opt(
                VehicleDocument::RegistrationCertificate.field_name(),
                self.rc_image,
            )
            .file_opt(VehicleDocument::Insurance.field_name(), self.insurance_image)
            .file_opt(VehicleDocument::Pollution.field_name(), self.pollution_image)
            .file_opt(VehicleDocument::Speedometer.field_name(), self.speed_image)
    }
}
