//! `fleetdesk-core`: shared building blocks for the fleet dashboard client.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage).

pub mod date;
pub mod entity;
pub mod error;
pub mod form;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use form::{FormData, Upload};
pub use id::{BunkId, FuelId, UserId, VehicleId};
