//! Entity trait: records whose identity survives mutation.

/// Entity marker + minimal interface.
///
/// Two entities are the same record when their ids match, even if every other
/// field differs (e.g. before and after a partial update).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Whether `other` is the same stored record as `self`.
    fn is_same_record(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
