//! Projectile-versus-target collision.
//!
//! Each projectile hits at most one target: the first hostile entity in
//! slot order strictly within the collision radius. The projectile is
//! removed on any hit, whether or not armor absorbed the damage.
//!
//! A projectile never hits itself, the entity that fired it, or anything
//! sharing its faction.

use tracing::trace;

use crate::entity::{ComponentMask, Entity, EntityId, Faction};
use crate::world::World;

use super::kinematics::PROJECTILE_MASK;
use super::{apply_hit, CombatEvent, DamageKind};

/// Components every collision target carries.
pub const TARGET_MASK: ComponentMask = ComponentMask::TRANSFORM.union(ComponentMask::HEALTH);

/// Resolves projectile hits for this tick.
///
/// # Arguments
///
/// * `world` - The world to resolve in
/// * `radius` - Hit radius; a target at exactly this distance is missed
/// * `events` - Receives damage and defeat events
///
/// # Returns
///
/// The number of projectiles that hit something.
pub fn resolve(world: &mut World, radius: f32, events: &mut Vec<CombatEvent>) -> usize {
    let projectiles = world.query(PROJECTILE_MASK);
    let targets = world.query(TARGET_MASK);
    let mut hits = 0;

    for projectile_id in projectiles {
        let Some(shot) = world.get_entity(projectile_id).and_then(Entity::projectile) else {
            trace!(projectile = %projectile_id, "stale projectile skipped");
            continue;
        };
        let position = shot.transform.position;
        let damage = shot.projectile.damage;
        let source = shot.projectile.source;
        let faction = shot.faction;

        let Some(target_id) = first_target(world, &targets, projectile_id, source, faction, |t| {
            t.distance(position) < radius
        }) else {
            continue;
        };

        trace!(projectile = %projectile_id, victim = %target_id, "projectile hit");
        apply_hit(world, target_id, damage, source, DamageKind::Projectile, events);
        world.remove_entity(projectile_id);
        hits += 1;
    }
    hits
}

/// First live, hostile target in `candidates` that satisfies `in_reach`.
///
/// Candidates that no longer exist, `exclude`, and `source` are skipped.
pub(crate) fn first_target(
    world: &World,
    candidates: &[EntityId],
    exclude: EntityId,
    source: Option<EntityId>,
    faction: Option<Faction>,
    in_reach: impl Fn(glam::Vec2) -> bool,
) -> Option<EntityId> {
    candidates.iter().copied().find(|&id| {
        if id == exclude || Some(id) == source {
            return false;
        }
        world
            .get_entity(id)
            .and_then(Entity::combatant)
            .is_some_and(|target| {
                Faction::is_hostile(faction, target.faction) && in_reach(target.transform.position)
            })
    })
}
