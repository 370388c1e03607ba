//! Local search and filtering over store snapshots.
//!
//! These never touch the network; views run them on whatever the stores
//! currently hold.

use chrono::NaiveDate;

use fleetdesk_core::VehicleId;
use fleetdesk_fleet::{FuelRecord, Vehicle, VehicleStatus, VerificationStatus};
use fleetdesk_parties::{Bunk, User};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleQuery {
    /// Matched against the plate number.
    pub search: String,
    /// Empty means any status.
    pub statuses: Vec<VehicleStatus>,
}

impl VehicleQuery {
    pub fn matches(&self, vehicle: &Vehicle, today: NaiveDate) -> bool {
        contains_ci(&vehicle.vehicle_number, self.search.trim())
            && (self.statuses.is_empty() || self.statuses.contains(&vehicle.status_on(today)))
    }

    pub fn apply<'a>(&self, vehicles: &'a [Vehicle], today: NaiveDate) -> Vec<&'a Vehicle> {
        vehicles.iter().filter(|v| self.matches(v, today)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuelQuery {
    /// Matched against the embedded vehicle's plate number.
    pub search: String,
    pub vehicle_id: Option<VehicleId>,
    pub status: Option<VerificationStatus>,
    /// The range applies only when both ends are set; both are inclusive.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FuelQuery {
    pub fn matches(&self, record: &FuelRecord) -> bool {
        let search = self.search.trim();
        if !search.is_empty()
            && !record
                .vehicle_number()
                .is_some_and(|plate| contains_ci(plate, search))
        {
            return false;
        }

        if self.vehicle_id.is_some_and(|id| id != record.vehicle_id) {
            return false;
        }

        if self.status.is_some_and(|status| status != record.status()) {
            return false;
        }

        match (self.from, self.to) {
            (Some(from), Some(to)) => (from..=to).contains(&record.date),
            _ => true,
        }
    }

    pub fn apply<'a>(&self, records: &'a [FuelRecord]) -> Vec<&'a FuelRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// "Above N" balance filter offered on the bunk list. Inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumBalance(u32);

impl MinimumBalance {
    pub const ALL: [MinimumBalance; 3] = [
        MinimumBalance(10_000),
        MinimumBalance(20_000),
        MinimumBalance(50_000),
    ];

    pub fn at_least(floor: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.0 == floor)
    }

    pub fn floor(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, amount: f64) -> bool {
        amount >= f64::from(self.0)
    }

    pub fn label(&self) -> String {
        format!("Above {}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BunkQuery {
    /// Matched against bunk name or owner name.
    pub search: String,
    /// `None` means any balance.
    pub minimum: Option<MinimumBalance>,
}

impl BunkQuery {
    pub fn matches(&self, bunk: &Bunk) -> bool {
        let search = self.search.trim();
        let text = contains_ci(&bunk.bunk_name, search) || contains_ci(&bunk.owner_name, search);

        text && self.minimum.is_none_or(|m| m.contains(bunk.amount))
    }

    pub fn apply<'a>(&self, bunks: &'a [Bunk]) -> Vec<&'a Bunk> {
        bunks.iter().filter(|b| self.matches(b)).collect()
    }
}

/// "Below N" wallet filter offered on the driver list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountBracket(u32);

impl AmountBracket {
    pub const ALL: [AmountBracket; 6] = [
        AmountBracket(5_000),
        AmountBracket(10_000),
        AmountBracket(15_000),
        AmountBracket(20_000),
        AmountBracket(25_000),
        AmountBracket(30_000),
    ];

    /// Only the offered brackets are accepted.
    pub fn below(limit: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.0 == limit)
    }

    pub fn limit(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, amount: f64) -> bool {
        amount < f64::from(self.0)
    }

    pub fn label(&self) -> String {
        format!("Below {}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverQuery {
    /// Matched against name, email or phone number.
    pub search: String,
    /// `None` means all amounts.
    pub bracket: Option<AmountBracket>,
}

impl DriverQuery {
    pub fn matches(&self, driver: &User) -> bool {
        let search = self.search.trim();
        let text = contains_ci(&driver.name, search)
            || contains_ci(&driver.email, search)
            || contains_ci(&driver.phone_number, search);

        text && self.bracket.is_none_or(|b| b.contains(driver.amount))
    }

    pub fn apply<'a>(&self, drivers: &'a [User]) -> Vec<&'a User> {
        drivers.iter().filter(|d| self.matches(d)).collect()
    }
}
