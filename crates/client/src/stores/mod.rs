//! One store per remote collection.

pub mod bunk;
pub mod driver;
pub mod fuel;
pub mod user;
pub mod vehicle;

pub use bunk::BunkStore;
pub use driver::DriverStore;
pub use fuel::FuelStore;
pub use user::{ProfileState, UserStore};
pub use vehicle::VehicleStore;
