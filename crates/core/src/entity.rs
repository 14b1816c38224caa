//! Entity trait: identity that survives field changes.

/// A record whose identity is its id, not its field values.
///
/// Updating every mutable field of an invoice leaves it the same invoice.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
