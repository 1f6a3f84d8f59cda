//! Per-entity component storage.

use serde::{Deserialize, Serialize};

use super::components::{
    Attack, Defense, Energy, Faction, Health, TrajectoryProjectile, Transform,
};
use super::{ComponentKind, ComponentMask};
use crate::error::ComponentError;

mod sealed {
    pub trait Sealed {}
}

/// A type that can be stored in a [`ComponentSet`].
///
/// This trait is sealed: the component registry is closed and every
/// implementor maps to one [`ComponentKind`] and one storage slot.
pub trait Component: sealed::Sealed + Sized + 'static {
    /// The kind this type is registered as.
    const KIND: ComponentKind;

    #[doc(hidden)]
    fn slot(set: &ComponentSet) -> &Option<Self>;

    #[doc(hidden)]
    fn slot_mut(set: &mut ComponentSet) -> &mut Option<Self>;
}

/// Components attached to one entity, at most one per kind.
///
/// A `ComponentSet` also serves as a spawn blueprint: abilities return
/// sets that the combat system turns into entities.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use nightfall_core::entity::{ComponentKind, ComponentSet, Health, Transform};
///
/// let set = ComponentSet::new()
///     .with(Transform::at(Vec2::new(5.0, 5.0)))
///     .with(Health::new(30.0));
///
/// assert!(set.contains(ComponentKind::Health));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSet {
    pub(super) transform: Option<Transform>,
    pub(super) health: Option<Health>,
    pub(super) attack: Option<Attack>,
    pub(super) defense: Option<Defense>,
    pub(super) trajectory: Option<TrajectoryProjectile>,
    pub(super) energy: Option<Energy>,
    pub(super) faction: Option<Faction>,
}

impl ComponentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert) that replaces any existing
    /// component of the same kind.
    ///
    /// Intended for assembling blueprints where the set is known to be
    /// fresh; use [`insert`](Self::insert) when duplicates must be caught.
    #[must_use]
    pub fn with<C: Component>(mut self, component: C) -> Self {
        *C::slot_mut(&mut self) = Some(component);
        self
    }

    /// Attaches a component.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Duplicate`] if the kind is already present.
    pub fn insert<C: Component>(&mut self, component: C) -> Result<(), ComponentError> {
        let slot = C::slot_mut(self);
        if slot.is_some() {
            return Err(ComponentError::Duplicate { kind: C::KIND });
        }
        *slot = Some(component);
        Ok(())
    }

    /// Returns the component of type `C`, if present.
    #[must_use]
    pub fn get<C: Component>(&self) -> Option<&C> {
        C::slot(self).as_ref()
    }

    /// Returns the component of type `C` mutably, if present.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        C::slot_mut(self).as_mut()
    }

    /// Returns component `C`, attaching `default()` first if it is absent.
    pub fn get_or_insert_with<C: Component>(&mut self, default: impl FnOnce() -> C) -> &mut C {
        C::slot_mut(self).get_or_insert_with(default)
    }

    /// Detaches and returns the component of type `C`.
    pub fn remove<C: Component>(&mut self) -> Option<C> {
        C::slot_mut(self).take()
    }

    /// Whether a component of `kind` is present.
    #[must_use]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.transform.is_some(),
            ComponentKind::Health => self.health.is_some(),
            ComponentKind::Attack => self.attack.is_some(),
            ComponentKind::Defense => self.defense.is_some(),
            ComponentKind::TrajectoryProjectile => self.trajectory.is_some(),
            ComponentKind::Energy => self.energy.is_some(),
            ComponentKind::Faction => self.faction.is_some(),
        }
    }

    /// The kinds present, derived from the slots on every call.
    #[must_use]
    pub fn kinds(&self) -> ComponentMask {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .fold(ComponentMask::empty(), |mask, kind| mask | kind.mask())
    }

    /// Number of components present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds().bits().count_ones() as usize
    }

    /// Whether no components are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    /// Detaches every component.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl sealed::Sealed for $ty {}

        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn slot(set: &ComponentSet) -> &Option<Self> {
                &set.$field
            }

            fn slot_mut(set: &mut ComponentSet) -> &mut Option<Self> {
                &mut set.$field
            }
        }
    };
}

impl_component!(Transform, Transform, transform);
impl_component!(Health, Health, health);
impl_component!(Attack, Attack, attack);
impl_component!(Defense, Defense, defense);
impl_component!(TrajectoryProjectile, TrajectoryProjectile, trajectory);
impl_component!(Energy, Energy, energy);
impl_component!(Faction, Faction, faction);
