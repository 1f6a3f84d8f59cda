//! Abilities: cooldown and resource gating around an [`AbilityEffect`].
//!
//! # Architecture
//!
//! An [`Ability`] is a small state machine:
//!
//! ```text
//! Ready --activate--> OnCooldown { remaining } --update(dt)...--> Ready
//! ```
//!
//! Activation is two-phase. Every check (cooldown, energy, effect
//! preconditions) runs first against a read-only view of the caster; only
//! when all pass does the ability pay the cost, apply caster-side effects
//! and start the cooldown. A rejected activation leaves everything as it
//! was.
//!
//! Abilities hold no world references. They are bound to an owner by
//! registration with the [`CombatSystem`](crate::combat::CombatSystem),
//! which passes the caster in on each call.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightfall_core::ability::{Ability, AbilityEffect};
//! use nightfall_core::entity::{ComponentSet, Energy, Transform};
//! use nightfall_core::world::World;
//!
//! let mut world = World::new();
//! let caster = world.spawn(
//!     ComponentSet::new().with(Transform::default()).with(Energy::new(20.0)),
//! );
//!
//! let mut bolt = Ability::new(
//!     "magic_bolt",
//!     0.8,
//!     10.0,
//!     AbilityEffect::Projectile { speed: 300.0, lifetime: 1.0, damage: 15.0, acceleration: 0.0 },
//! );
//!
//! let entity = world.get_entity_mut(caster).unwrap();
//! let spawned = bolt.activate(entity, Vec2::new(100.0, 0.0)).unwrap();
//! assert_eq!(spawned.len(), 1);
//! assert!(!bolt.can_use(entity));
//!
//! bolt.update(0.8);
//! assert!(bolt.can_use(entity));
//! ```

pub mod catalog;
pub mod effect;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{ComponentKind, ComponentSet, Defense, Energy, Entity, Health};
use crate::error::AbilityError;
use crate::TIME_EPSILON;

pub use catalog::{AbilityCatalog, AbilityDef};
pub use effect::{AbilityEffect, MAX_AREA_PROJECTILES};

/// Damage bonus per level above the first.
pub const DAMAGE_PER_LEVEL: f32 = 0.1;

/// Cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AbilityState {
    /// May be activated, subject to cost.
    #[default]
    Ready,
    /// Cooling down.
    OnCooldown {
        /// Seconds until ready.
        remaining: f32,
    },
}

/// A castable ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    id: String,
    name: String,
    cooldown: f32,
    cost: f32,
    level: u32,
    effect: AbilityEffect,
    state: AbilityState,
}

impl Ability {
    /// Creates a ready, level-1 ability. The display name defaults to `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable identifier, used in events and catalogs
    /// * `cooldown` - Seconds between activations
    /// * `cost` - Energy paid per activation
    /// * `effect` - What the ability does
    #[must_use]
    pub fn new(id: impl Into<String>, cooldown: f32, cost: f32, effect: AbilityEffect) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            cooldown: cooldown.max(0.0),
            cost: cost.max(0.0),
            level: 1,
            effect,
            state: AbilityState::Ready,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full cooldown in seconds.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Energy cost per activation.
    #[must_use]
    pub const fn cost(&self) -> f32 {
        self.cost
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// The effect produced on activation.
    #[must_use]
    pub const fn effect(&self) -> &AbilityEffect {
        &self.effect
    }

    /// Current cooldown state.
    #[must_use]
    pub const fn state(&self) -> AbilityState {
        self.state
    }

    /// Whether the cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, AbilityState::Ready)
    }

    /// Seconds left on the cooldown; zero when ready.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        match self.state {
            AbilityState::Ready => 0.0,
            AbilityState::OnCooldown { remaining } => remaining,
        }
    }

    /// Remaining cooldown as a fraction of the full cooldown, for HUD
    /// sweeps. `0.0` when ready.
    #[must_use]
    pub fn cooldown_ratio(&self) -> f32 {
        if self.cooldown <= 0.0 {
            0.0
        } else {
            (self.remaining() / self.cooldown).clamp(0.0, 1.0)
        }
    }

    /// Damage multiplier for the current level.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn damage_scale(&self) -> f32 {
        1.0 + DAMAGE_PER_LEVEL * (self.level.saturating_sub(1)) as f32
    }

    /// Raises the level by one, up to `max_level`.
    ///
    /// # Returns
    ///
    /// `true` if the level changed.
    pub fn level_up(&mut self, max_level: u32) -> bool {
        if self.level >= max_level {
            return false;
        }
        self.level += 1;
        true
    }

    /// Whether `caster` may activate this ability now: the cooldown has
    /// elapsed, the cost is affordable and the caster has a [`Transform`]
    /// if the effect starts from it. A caster without an [`Energy`] pool
    /// pays nothing.
    ///
    /// [`Transform`]: crate::entity::Transform
    #[must_use]
    pub fn can_use(&self, caster: &Entity) -> bool {
        self.check(caster).is_ok()
    }

    /// Activates the ability.
    ///
    /// # Arguments
    ///
    /// * `caster` - The owning entity
    /// * `target_pos` - World-space aim point
    ///
    /// # Returns
    ///
    /// Blueprints for the entities the effect creates. The caller is
    /// responsible for spawning them.
    ///
    /// # Errors
    ///
    /// [`AbilityError`] if the ability is cooling down, the caster cannot
    /// pay, or the effect cannot be produced. No state changes in that case.
    pub fn activate(
        &mut self,
        caster: &mut Entity,
        target_pos: Vec2,
    ) -> Result<Vec<ComponentSet>, AbilityError> {
        self.check(caster)?;
        let plan = self.effect.plan(caster, target_pos, self.damage_scale())?;

        if let Some(energy) = caster.get_component_mut::<Energy>() {
            energy.spend(self.cost);
        }
        if plan.heal > 0.0 {
            if let Some(health) = caster.get_component_mut::<Health>() {
                health.heal(plan.heal);
            }
        }
        if let Some((amount, duration)) = plan.ward {
            caster
                .component_or_insert_with(|| Defense::new(0.0))
                .grant_ward(amount, duration);
        }

        self.state = if self.cooldown > TIME_EPSILON {
            AbilityState::OnCooldown {
                remaining: self.cooldown,
            }
        } else {
            AbilityState::Ready
        };
        Ok(plan.spawns)
    }

    /// Advances the cooldown by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if let AbilityState::OnCooldown { remaining } = self.state {
            let remaining = (remaining - dt).max(0.0);
            self.state = if remaining <= TIME_EPSILON {
                AbilityState::Ready
            } else {
                AbilityState::OnCooldown { remaining }
            };
        }
    }

    fn check(&self, caster: &Entity) -> Result<(), AbilityError> {
        if let AbilityState::OnCooldown { remaining } = self.state {
            return Err(AbilityError::OnCooldown { remaining });
        }
        if let Some(energy) = caster.get_component::<Energy>() {
            if !energy.can_afford(self.cost) {
                return Err(AbilityError::InsufficientEnergy {
                    required: self.cost,
                    available: energy.current(),
                });
            }
        }
        if self.effect.needs_caster_position() && !caster.has_component(ComponentKind::Transform) {
            return Err(AbilityError::MissingTransform);
        }
        Ok(())
    }
}
