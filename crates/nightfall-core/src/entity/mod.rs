//! Entities and their component sets.
//!
//! This module provides the core entity types for the combat world:
//! - [`EntityId`]: Generational handle into the [`World`](crate::world::World)
//! - [`ComponentKind`] / [`ComponentMask`]: The closed registry of component kinds
//! - [`ComponentSet`]: At most one component per kind
//! - [`Entity`]: Identity, active flag and component set
//!
//! # Architecture
//!
//! The component registry is closed. Each component type implements the
//! sealed [`Component`] trait, which ties it to exactly one
//! [`ComponentKind`] and one storage slot in [`ComponentSet`]. Lookups are
//! resolved at compile time; there is no string or type-id matching.
//!
//! Systems that need several components at once go through the capability
//! views in [`capability`] instead of chaining `Option` checks.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightfall_core::entity::{ComponentKind, Health, Transform};
//! use nightfall_core::world::World;
//!
//! let mut world = World::new();
//! let id = world.create_entity();
//!
//! let entity = world.get_entity_mut(id).unwrap();
//! entity.add_component(Transform::at(Vec2::new(10.0, 0.0))).unwrap();
//! entity.add_component(Health::new(100.0)).unwrap();
//!
//! assert!(entity.has_component(ComponentKind::Health));
//! assert!(entity.add_component(Health::new(5.0)).is_err());
//! ```

pub mod capability;
pub mod components;
mod storage;

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, Key};

use crate::error::ComponentError;

pub use capability::{Combatant, ProjectileMut, ProjectileView, Striker, TargetMut};
pub use components::{
    mitigated_damage, Attack, Defense, Energy, Faction, Health, TrajectoryProjectile, Transform,
};
pub use storage::{Component, ComponentSet};

// =============================================================================
// EntityId
// =============================================================================

new_key_type! {
    /// Generational handle to an entity.
    ///
    /// An id is a slot index plus a generation. When an entity is removed
    /// its slot may be reused, but with a new generation, so a stale id
    /// never resolves to the new occupant.
    ///
    /// Ids order by slot index first, which is also the
    /// [`World`](crate::world::World) iteration order.
    pub struct EntityId;
}

impl EntityId {
    /// Slot index within the world.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(self) -> u32 {
        (self.data().as_ffi() & 0xffff_ffff) as u32
    }

    /// Generation of the slot when this id was issued.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn generation(self) -> u32 {
        (self.data().as_ffi() >> 32) as u32
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// =============================================================================
// Component registry
// =============================================================================

/// The closed set of component kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// [`Transform`]
    Transform,
    /// [`Health`]
    Health,
    /// [`Attack`]
    Attack,
    /// [`Defense`]
    Defense,
    /// [`TrajectoryProjectile`]
    TrajectoryProjectile,
    /// [`Energy`]
    Energy,
    /// [`Faction`]
    Faction,
}

impl ComponentKind {
    /// Every kind, in storage order.
    pub const ALL: [Self; 7] = [
        Self::Transform,
        Self::Health,
        Self::Attack,
        Self::Defense,
        Self::TrajectoryProjectile,
        Self::Energy,
        Self::Faction,
    ];

    /// The single-bit mask for this kind.
    #[must_use]
    pub const fn mask(self) -> ComponentMask {
        match self {
            Self::Transform => ComponentMask::TRANSFORM,
            Self::Health => ComponentMask::HEALTH,
            Self::Attack => ComponentMask::ATTACK,
            Self::Defense => ComponentMask::DEFENSE,
            Self::TrajectoryProjectile => ComponentMask::TRAJECTORY_PROJECTILE,
            Self::Energy => ComponentMask::ENERGY,
            Self::Faction => ComponentMask::FACTION,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transform => "Transform",
            Self::Health => "Health",
            Self::Attack => "Attack",
            Self::Defense => "Defense",
            Self::TrajectoryProjectile => "TrajectoryProjectile",
            Self::Energy => "Energy",
            Self::Faction => "Faction",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// A set of component kinds, used for queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ComponentMask: u16 {
        /// [`Transform`]
        const TRANSFORM = 1 << 0;
        /// [`Health`]
        const HEALTH = 1 << 1;
        /// [`Attack`]
        const ATTACK = 1 << 2;
        /// [`Defense`]
        const DEFENSE = 1 << 3;
        /// [`TrajectoryProjectile`]
        const TRAJECTORY_PROJECTILE = 1 << 4;
        /// [`Energy`]
        const ENERGY = 1 << 5;
        /// [`Faction`]
        const FACTION = 1 << 6;
    }
}

impl From<ComponentKind> for ComponentMask {
    fn from(kind: ComponentKind) -> Self {
        kind.mask()
    }
}

// =============================================================================
// Entity
// =============================================================================

/// An entity: identity, active flag and components.
///
/// Entities are created only through the [`World`](crate::world::World).
/// An inactive entity still exists but is excluded from world queries
/// until it is swept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    active: bool,
    components: ComponentSet,
}

impl Entity {
    pub(crate) fn new(id: EntityId, components: ComponentSet) -> Self {
        Self {
            id,
            active: true,
            components,
        }
    }

    /// The entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the entity takes part in queries.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Attaches a component.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Duplicate`] if a component of the same kind
    /// is already attached. The existing component is left untouched.
    pub fn add_component<C: Component>(&mut self, component: C) -> Result<(), ComponentError> {
        self.components.insert(component)
    }

    /// Returns the component of type `C`, if attached.
    #[must_use]
    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    /// Returns the component of type `C` mutably, if attached.
    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    /// Returns component `C`, attaching `default()` first if it is absent.
    pub fn component_or_insert_with<C: Component>(&mut self, default: impl FnOnce() -> C) -> &mut C {
        self.components.get_or_insert_with(default)
    }

    /// Detaches and returns the component of type `C`.
    pub fn remove_component<C: Component>(&mut self) -> Option<C> {
        self.components.remove::<C>()
    }

    /// Whether a component of `kind` is attached.
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains(kind)
    }

    /// Whether every kind in `mask` is attached.
    #[must_use]
    pub fn has_all(&self, mask: ComponentMask) -> bool {
        self.components.kinds().contains(mask)
    }

    /// The kinds currently attached.
    #[must_use]
    pub fn kinds(&self) -> ComponentMask {
        self.components.kinds()
    }

    /// Read access to the full component set.
    #[must_use]
    pub const fn components(&self) -> &ComponentSet {
        &self.components
    }
}
