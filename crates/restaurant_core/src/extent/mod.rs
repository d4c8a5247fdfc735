//! Per-kind in-memory extents.
//!
//! # Responsibility
//! - Hold the canonical ordered list of live instances of one entity kind.
//! - Detect duplicates by structural key, not by identity.
//!
//! # Invariants
//! - An extent never holds two entities with equal `Entity::key`.
//! - After `replace`, no two entities share an identifier.
//! - Insertion order is preserved by `add` and `replace`.
//! - Extent primitives never cascade relationship changes; see
//!   `crate::relation` for link-aware removal.

use crate::model::EntityId;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display, Formatter};

mod registry;

pub use registry::{HasExtent, Registry};

/// Contract shared by every record stored in an extent.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned {
    /// Kind name used in logs, errors and persisted file names.
    const KIND: &'static str;

    /// Fields that define structural equality for this kind.
    type Key: PartialEq + Debug;

    fn id(&self) -> EntityId;

    fn key(&self) -> Self::Key;

    fn same_entity(&self, other: &Self) -> bool {
        self.key() == other.key()
    }

    /// Whether any relationship field currently points at another entity.
    fn has_links(&self) -> bool {
        false
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::KIND, self.id())
    }
}

/// Kind-qualified identifier, e.g. `Order#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRef {
    pub kind: &'static str,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: &'static str, id: EntityId) -> Self {
        Self { kind, id }
    }

    pub fn of<T: Entity>(id: EntityId) -> Self {
        Self::new(T::KIND, id)
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Ordered, duplicate-free collection of one entity kind.
#[derive(Debug, Clone)]
pub struct Extent<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> Default for Extent<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Extent<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entity` unless a structurally-equal one is already present.
    ///
    /// Returns `false` for the duplicate no-op.
    pub fn add(&mut self, entity: T) -> bool {
        if self.items.iter().any(|existing| existing.same_entity(&entity)) {
            debug!(
                "event=extent_add module=extent status=skip kind={} id={} reason=duplicate",
                T::KIND,
                entity.id()
            );
            return false;
        }
        debug!(
            "event=extent_add module=extent status=ok kind={} id={}",
            T::KIND,
            entity.id()
        );
        self.items.push(entity);
        true
    }

    /// Read-only view of current instances in insertion order.
    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes the first structurally-equal entity.
    ///
    /// Callers must have torn down relationship links beforehand.
    pub fn remove(&mut self, entity: &T) -> bool {
        match self.items.iter().position(|existing| existing.same_entity(entity)) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Swaps the whole backing sequence.
    ///
    /// Only the first entity per identifier is kept. Every key contains the
    /// id, so this also drops structural duplicates. Returns how many were
    /// dropped.
    pub fn replace(&mut self, entities: Vec<T>) -> usize {
        let incoming = entities.len();
        let mut deduped: Vec<T> = Vec::with_capacity(incoming);
        for entity in entities {
            if !deduped.iter().any(|existing| existing.id() == entity.id()) {
                deduped.push(entity);
            }
        }
        let dropped = incoming - deduped.len();
        if dropped > 0 {
            debug!(
                "event=extent_replace module=extent status=ok kind={} dropped_duplicates={}",
                T::KIND,
                dropped
            );
        }
        self.items = deduped;
        dropped
    }

    /// First entity with identifier `id`.
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|entity| entity.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|entity| entity.id() == id)
    }

    pub(crate) fn take(&mut self, id: EntityId) -> Option<T> {
        let index = self.items.iter().position(|entity| entity.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn contains_id(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next free identifier: one past the current maximum.
    pub fn next_id(&self) -> EntityId {
        self.items
            .iter()
            .map(Entity::id)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }
}

impl<'a, T: Entity> IntoIterator for &'a Extent<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, EntityRef, Extent};
    use crate::model::dish::Dish;

    fn dish(id: u32, name: &str) -> Dish {
        Dish::new(id, name, "Italian", 1200, vec!["flour".to_string()]).expect("valid dish")
    }

    #[test]
    fn add_skips_structural_duplicate() {
        let mut extent = Extent::new();
        assert!(extent.add(dish(1, "Pizza")));
        let mut twin = dish(1, "Pizza");
        twin.price_cents = 9_999;
        assert!(!extent.add(twin));
        assert_eq!(extent.len(), 1);
        assert_eq!(extent.all()[0].price_cents, 1200);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut extent = Extent::new();
        extent.add(dish(3, "Soup"));
        extent.add(dish(1, "Pizza"));
        let ids: Vec<u32> = extent.iter().map(Entity::id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn remove_reports_whether_anything_was_removed() {
        let mut extent = Extent::new();
        extent.add(dish(1, "Pizza"));
        assert!(!extent.remove(&dish(1, "Pasta")));
        assert!(extent.remove(&dish(1, "Pizza")));
        assert!(extent.is_empty());
    }

    #[test]
    fn replace_drops_later_duplicates() {
        let mut extent = Extent::new();
        extent.add(dish(9, "Old"));
        let dropped = extent.replace(vec![dish(1, "Pizza"), dish(2, "Soup"), dish(1, "Pizza")]);
        assert_eq!(dropped, 1);
        assert_eq!(extent.len(), 2);
        assert!(!extent.contains_id(9));
    }

    #[test]
    fn replace_keeps_first_record_per_id() {
        let mut extent = Extent::new();
        let dropped = extent.replace(vec![dish(1, "A"), dish(1, "B"), dish(2, "C")]);
        assert_eq!(dropped, 1);
        let names: Vec<&str> = extent.iter().map(|dish| dish.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(extent.get(1).expect("dish 1").name, "A");
    }

    #[test]
    fn next_id_is_one_past_max() {
        let mut extent = Extent::new();
        assert_eq!(extent.next_id(), 1);
        extent.add(dish(4, "Pizza"));
        extent.add(dish(2, "Soup"));
        assert_eq!(extent.next_id(), 5);
    }

    #[test]
    fn entity_ref_display_is_kind_qualified() {
        assert_eq!(EntityRef::of::<Dish>(4).to_string(), "Dish#4");
    }
}
