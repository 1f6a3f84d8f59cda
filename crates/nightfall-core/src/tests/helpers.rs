//! Test helper functions for setting up worlds and entities.
//!
//! Factory functions here build the standard cast used across scenario,
//! determinism and property tests.

use glam::Vec2;

use crate::ability::{Ability, AbilityEffect};
use crate::combat::CombatSystem;
use crate::entity::{
    Attack, ComponentSet, Defense, Energy, EntityId, Faction, Health, TrajectoryProjectile,
    Transform,
};
use crate::world::World;

// =============================================================================
// Entity Factory Functions
// =============================================================================

/// Spawns a target with Transform, Health and Defense.
///
/// # Arguments
///
/// * `world` - The world to spawn in
/// * `position` - Where the target stands
/// * `health` - Max (and current) health
/// * `armor` - Flat armor
pub fn spawn_target(world: &mut World, position: Vec2, health: f32, armor: f32) -> EntityId {
    world.spawn(
        ComponentSet::new()
            .with(Transform::at(position))
            .with(Health::new(health))
            .with(Defense::new(armor)),
    )
}

/// Spawns a melee attacker with 100 health.
pub fn spawn_melee(world: &mut World, position: Vec2, damage: f32, range: f32, speed: f32) -> EntityId {
    world.spawn(
        ComponentSet::new()
            .with(Transform::at(position))
            .with(Health::new(100.0))
            .with(Attack::new(damage, range, speed)),
    )
}

/// Spawns a caster with 100 health, the given energy pool and faction.
pub fn spawn_caster(world: &mut World, position: Vec2, energy: f32, faction: Faction) -> EntityId {
    world.spawn(
        ComponentSet::new()
            .with(Transform::at(position))
            .with(Health::new(100.0))
            .with(Energy::new(energy))
            .with(faction),
    )
}

/// Spawns an unowned projectile.
pub fn spawn_projectile(
    world: &mut World,
    position: Vec2,
    velocity: Vec2,
    lifetime: f32,
    damage: f32,
) -> EntityId {
    world.spawn(
        ComponentSet::new()
            .with(Transform::at(position))
            .with(TrajectoryProjectile::new(velocity, lifetime, damage)),
    )
}

// =============================================================================
// Ability Factory Functions
// =============================================================================

/// A straight-flying bolt.
pub fn bolt(cooldown: f32, cost: f32, damage: f32) -> Ability {
    Ability::new(
        "bolt",
        cooldown,
        cost,
        AbilityEffect::Projectile {
            speed: 300.0,
            lifetime: 2.0,
            damage,
            acceleration: 0.0,
        },
    )
}

/// A radial burst of `count` projectiles.
pub fn nova(count: u32, damage: f32) -> Ability {
    Ability::new(
        "nova",
        3.0,
        0.0,
        AbilityEffect::AreaEffect {
            count,
            speed: 120.0,
            lifetime: 0.5,
            damage,
        },
    )
}

// =============================================================================
// Simulation Helpers
// =============================================================================

/// Runs `ticks` updates of `dt` each.
pub fn run(combat: &mut CombatSystem, world: &mut World, ticks: usize, dt: f32) {
    for _ in 0..ticks {
        combat.update(world, dt);
    }
}

/// Current health of `id`, or `None` if it is gone or has no health.
pub fn health_of(world: &World, id: EntityId) -> Option<f32> {
    world.get_component::<Health>(id).map(Health::current)
}
