use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_core::{BunkId, DomainError, DomainResult, Entity};

/// Fuel-station partner as returned by `GET /bunks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bunk {
    pub id: BunkId,
    pub bunk_name: String,
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    /// Running balance with this partner.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Bunk {
    type Id = BunkId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Body of `POST /bunks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBunk {
    pub bunk_name: String,
    pub owner_name: String,
    pub phone_number: String,
    pub address: String,
    pub amount: f64,
}

impl NewBunk {
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            &self.bunk_name,
            &self.owner_name,
            &self.phone_number,
            &self.address,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) || !self.amount.is_finite() {
            return Err(DomainError::validation("Please fill all fields"));
        }
        Ok(())
    }
}
