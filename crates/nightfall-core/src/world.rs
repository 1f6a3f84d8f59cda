//! The entity world.
//!
//! The [`World`] owns every entity in a combat simulation. It provides:
//! - Entity lifecycle (create/spawn/remove) over a generational arena
//! - Component access by entity id
//! - Snapshot queries by component kind or mask
//! - Deferred removal through the active flag
//!
//! # Architecture
//!
//! Entities live in a [`SlotMap`] keyed by [`EntityId`]. Removing an entity
//! frees its slot and bumps the slot's generation, so ids held across
//! ticks either resolve to the same entity or to nothing.
//!
//! Queries return a materialized `Vec<EntityId>` rather than an iterator.
//! Systems iterate the snapshot and re-resolve each id, which makes it
//! safe to remove entities (including ones later in the snapshot) while
//! walking it.
//!
//! # Determinism
//!
//! Iteration follows slot order. Given the same sequence of creations and
//! removals, two worlds iterate identically.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightfall_core::entity::{ComponentKind, ComponentSet, Health, Transform};
//! use nightfall_core::world::World;
//!
//! let mut world = World::new();
//! let a = world.spawn(ComponentSet::new().with(Transform::at(Vec2::ZERO)).with(Health::new(10.0)));
//! let b = world.spawn(ComponentSet::new().with(Transform::at(Vec2::X)));
//!
//! assert_eq!(world.get_entities_with_component(ComponentKind::Transform), vec![a, b]);
//! assert_eq!(world.get_entities_with_component(ComponentKind::Health), vec![a]);
//!
//! world.remove_entity(a);
//! assert!(!world.has_entity(a));
//! assert!(world.remove_entity(a).is_none());
//! ```

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::trace;

use crate::entity::{Component, ComponentKind, ComponentMask, ComponentSet, Entity, EntityId};

/// Container for all entities in a simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: SlotMap<EntityId, Entity>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an active entity with no components.
    ///
    /// # Returns
    ///
    /// A fresh id. Ids are never reused while the previous holder of the
    /// slot could still be referenced.
    pub fn create_entity(&mut self) -> EntityId {
        self.spawn(ComponentSet::new())
    }

    /// Creates an active entity carrying `components`.
    ///
    /// # Arguments
    ///
    /// * `components` - The initial component set, typically a blueprint
    ///   returned by an ability
    pub fn spawn(&mut self, components: ComponentSet) -> EntityId {
        let id = self
            .entities
            .insert_with_key(|id| Entity::new(id, components));
        trace!(entity = %id, "spawned");
        id
    }

    /// Removes an entity from the world.
    ///
    /// Idempotent: removing a stale or unknown id is a no-op.
    ///
    /// # Returns
    ///
    /// The entity, marked inactive and still carrying its components, or
    /// `None` if it did not exist.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(id)?;
        entity.set_active(false);
        trace!(entity = %id, "removed");
        Some(entity)
    }

    /// Whether `id` refers to a live entity.
    #[must_use]
    pub fn has_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Returns the entity for `id`.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Returns the entity for `id` mutably.
    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Returns component `C` of entity `id`.
    #[must_use]
    pub fn get_component<C: Component>(&self, id: EntityId) -> Option<&C> {
        self.entities.get(id)?.get_component::<C>()
    }

    /// Returns component `C` of entity `id` mutably.
    pub fn get_component_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        self.entities.get_mut(id)?.get_component_mut::<C>()
    }

    /// Snapshot of active entities carrying `kind`, in slot order.
    #[must_use]
    pub fn get_entities_with_component(&self, kind: ComponentKind) -> Vec<EntityId> {
        self.query(kind.mask())
    }

    /// Snapshot of active entities carrying every kind in `mask`, in slot
    /// order. An empty mask matches every active entity.
    #[must_use]
    pub fn query(&self, mask: ComponentMask) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.is_active() && entity.has_all(mask))
            .map(|(id, _)| id)
            .collect()
    }

    /// Marks an entity inactive. It stays resolvable by id but drops out of
    /// queries until [`sweep_inactive`](Self::sweep_inactive) removes it.
    ///
    /// # Returns
    ///
    /// `true` if the entity existed.
    pub fn deactivate(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.set_active(false);
                true
            }
            None => false,
        }
    }

    /// Removes every inactive entity.
    ///
    /// # Returns
    ///
    /// How many entities were removed.
    pub fn sweep_inactive(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, entity| entity.is_active());
        before - self.entities.len()
    }

    /// Iterates live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Iterates live entity ids in slot order.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    /// Number of live entities, active or not.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether the world holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Removes every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Attack, Health, Transform};
    use glam::Vec2;

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn create_entity_is_empty_and_active() {
            let mut world = World::new();
            let id = world.create_entity();

            let entity = world.get_entity(id).unwrap();
            assert!(entity.is_active());
            assert!(entity.kinds().is_empty());
            assert_eq!(entity.id(), id);
        }

        #[test]
        fn ids_are_unique() {
            let mut world = World::new();
            let ids: Vec<_> = (0..16).map(|_| world.create_entity()).collect();
            let mut sorted = ids.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), ids.len());
        }

        #[test]
        fn remove_is_idempotent() {
            let mut world = World::new();
            let id = world.spawn(ComponentSet::new().with(Health::new(10.0)));

            let removed = world.remove_entity(id).unwrap();
            assert!(!removed.is_active());
            assert!(world.remove_entity(id).is_none());
            assert!(world.remove_entity(id).is_none());
            assert!(world.is_empty());
        }

        #[test]
        fn stale_id_does_not_resolve_to_new_occupant() {
            let mut world = World::new();
            let old = world.create_entity();
            world.remove_entity(old);
            let new = world.spawn(ComponentSet::new().with(Health::new(5.0)));

            assert_eq!(old.index(), new.index());
            assert!(!world.has_entity(old));
            assert!(world.get_component::<Health>(old).is_none());
            assert!(world.has_entity(new));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn kind_query_is_snapshot_in_slot_order() {
            let mut world = World::new();
            let a = world.spawn(ComponentSet::new().with(Health::new(1.0)));
            let _ = world.spawn(ComponentSet::new().with(Transform::default()));
            let c = world.spawn(ComponentSet::new().with(Health::new(1.0)));

            let snapshot = world.get_entities_with_component(ComponentKind::Health);
            assert_eq!(snapshot, vec![a, c]);

            for id in &snapshot {
                world.remove_entity(*id);
            }
            assert_eq!(snapshot.len(), 2);
            assert!(world.get_entities_with_component(ComponentKind::Health).is_empty());
        }

        #[test]
        fn mask_query_needs_every_kind() {
            let mut world = World::new();
            let melee = world.spawn(
                ComponentSet::new()
                    .with(Transform::default())
                    .with(Health::default())
                    .with(Attack::default()),
            );
            let _dummy = world.spawn(
                ComponentSet::new()
                    .with(Transform::default())
                    .with(Health::default()),
            );

            let mask = ComponentMask::TRANSFORM | ComponentMask::HEALTH | ComponentMask::ATTACK;
            assert_eq!(world.query(mask), vec![melee]);
            assert_eq!(world.query(ComponentMask::empty()).len(), 2);
        }

        #[test]
        fn component_added_later_is_visible() {
            let mut world = World::new();
            let id = world.create_entity();
            assert!(world.get_entities_with_component(ComponentKind::Transform).is_empty());

            world
                .get_entity_mut(id)
                .unwrap()
                .add_component(Transform::at(Vec2::new(3.0, 4.0)))
                .unwrap();
            assert_eq!(world.get_entities_with_component(ComponentKind::Transform), vec![id]);
        }
    }

    mod deactivate_tests {
        use super::*;

        #[test]
        fn inactive_entities_leave_queries_then_get_swept() {
            let mut world = World::new();
            let a = world.spawn(ComponentSet::new().with(Health::default()));
            let b = world.spawn(ComponentSet::new().with(Health::default()));

            assert!(world.deactivate(a));
            assert!(world.has_entity(a));
            assert_eq!(world.get_entities_with_component(ComponentKind::Health), vec![b]);

            assert_eq!(world.sweep_inactive(), 1);
            assert!(!world.has_entity(a));
            assert!(world.has_entity(b));
        }

        #[test]
        fn deactivate_unknown_is_false() {
            let mut world = World::new();
            let id = world.create_entity();
            world.remove_entity(id);
            assert!(!world.deactivate(id));
        }
    }
}
