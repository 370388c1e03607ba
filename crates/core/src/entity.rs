//! Entity trait: identity assigned by the remote API.

/// Entity marker + minimal interface.
///
/// Stores use the identity to patch single records in place and to drop
/// removed records without a refetch.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
