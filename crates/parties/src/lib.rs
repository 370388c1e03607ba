//! Parties domain module: fuel bunks and the people on the roster.
//!
//! Wire schemas and form rules for bunks, drivers and users, implemented as
//! plain data plus validation (no IO, no HTTP, no storage).

pub mod bunk;
pub mod staff;

pub use bunk::{Bunk, NewBunk};
pub use staff::{DocumentKind, DocumentState, DriverDraft, NewDriver, ProfileField, User};
