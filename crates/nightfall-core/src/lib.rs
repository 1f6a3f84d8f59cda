//! # Nightfall Core
//!
//! Real-time combat core for Nightfall Defenders.
//!
//! This crate provides the entity world and the combat resolution engine:
//! entity/component storage, ability cooldowns, projectile kinematics,
//! melee gating and armor-mitigated damage.
//!
//! ## Architecture
//!
//! - **[`world`]**: Generational entity store with snapshot queries
//! - **[`entity`]**: Components, the closed component registry, capability views
//! - **[`ability`]**: Cooldown/energy state machine, effects, data-driven catalog
//! - **[`combat`]**: The per-tick pipeline and the ability entry point
//! - **[`config`]** / **[`error`]**: Tunables and error types
//!
//! The world is always passed explicitly. Nothing in this crate holds a
//! global or a back-reference to the world.
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use nightfall_core::ability::{Ability, AbilityEffect};
//! use nightfall_core::combat::{CombatSystem, FIXED_DT};
//! use nightfall_core::entity::{ComponentSet, Defense, Health, Transform};
//! use nightfall_core::world::World;
//!
//! let mut world = World::new();
//! let mut combat = CombatSystem::new();
//!
//! let mage = world.spawn(ComponentSet::new().with(Transform::at(Vec2::ZERO)).with(Health::new(80.0)));
//! let dummy = world.spawn(
//!     ComponentSet::new()
//!         .with(Transform::at(Vec2::new(100.0, 0.0)))
//!         .with(Health::new(50.0))
//!         .with(Defense::new(5.0)),
//! );
//!
//! let bolt = Ability::new(
//!     "magic_bolt",
//!     0.8,
//!     0.0,
//!     AbilityEffect::Projectile { speed: 300.0, lifetime: 1.0, damage: 15.0, acceleration: 0.0 },
//! );
//! combat.register_entity_abilities(mage, vec![bolt]);
//! assert!(combat.use_ability(&mut world, mage, 0, Vec2::new(100.0, 0.0)));
//!
//! for _ in 0..30 {
//!     combat.update(&mut world, FIXED_DT);
//! }
//! assert_eq!(world.get_component::<Health>(dummy).unwrap().current(), 40.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ability;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod world;

#[cfg(test)]
mod tests;

pub use ability::{Ability, AbilityCatalog, AbilityEffect};
pub use combat::{CombatEvent, CombatSystem};
pub use config::CombatConfig;
pub use entity::{ComponentKind, ComponentSet, Entity, EntityId};
pub use error::{AbilityError, ComponentError, ConfigError};
pub use world::World;

/// Tolerance for time comparisons.
///
/// Cooldowns, lifetimes and attack gates accumulate `f32` steps; a 2.0 s
/// cooldown ticked as `1.9 + 0.1` must count as elapsed.
pub const TIME_EPSILON: f32 = 1e-5;
