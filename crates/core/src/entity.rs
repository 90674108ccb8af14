//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog collections are keyed by entity id: an upsert replaces the record
/// with the same id in place, otherwise appends.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Replace the entity sharing `entity`'s id, or append it.
///
/// Returns `true` when an existing record was replaced.
pub fn upsert_by_id<E: Entity>(records: &mut Vec<E>, entity: E) -> bool {
    match records.iter().position(|r| r.id() == entity.id()) {
        Some(idx) => {
            records[idx] = entity;
            true
        }
        None => {
            records.push(entity);
            false
        }
    }
}
