//! Fleet domain module: vehicles and their fuel records.
//!
//! This crate contains the wire schemas and client-side business rules for
//! vehicles and fuel (no IO, no HTTP, no storage).

pub mod fuel;
pub mod vehicle;

pub use fuel::{
    FuelBunkRef, FuelDraft, FuelRecord, FuelVehicleRef, FuelVerification, NewFuelRecord,
    VerificationFlag, VerificationStatus,
};
pub use vehicle::{Vehicle, VehicleDocument, VehicleForm, VehicleStatus};
