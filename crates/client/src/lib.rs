//! `fleetdesk-client`: data-access layer of the fleet dashboard.
//!
//! Owns every network and storage concern: configuration, the HTTP
//! transport, the durable token file, and one store per remote collection.

pub mod config;
pub mod error;
pub mod filters;
pub mod http;
pub mod services;
pub mod store;
pub mod stores;
pub mod token_store;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use filters::{
    AmountBracket, BunkQuery, DriverQuery, FuelQuery, MinimumBalance, VehicleQuery,
};
pub use http::{Access, ApiClient, Body, Reply};
pub use services::Services;
pub use store::{Collection, FetchOutcome, ResourceStore, StoreState};
pub use stores::{BunkStore, DriverStore, FuelStore, ProfileState, UserStore, VehicleStore};
pub use token_store::SqliteTokenStore;
