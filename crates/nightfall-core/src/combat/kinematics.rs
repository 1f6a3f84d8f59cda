//! Projectile integration.
//!
//! Explicit Euler with the pre-update velocity:
//!
//! ```text
//! position += velocity * dt
//! velocity += acceleration * dt
//! lifetime -= dt
//! ```
//!
//! A projectile whose lifetime reaches zero is removed in the same tick.

use tracing::trace;

use crate::entity::ComponentMask;
use crate::world::World;

use super::CombatEvent;

/// Components every integrated projectile carries.
pub const PROJECTILE_MASK: ComponentMask =
    ComponentMask::TRANSFORM.union(ComponentMask::TRAJECTORY_PROJECTILE);

/// Advances every projectile by `dt` and removes the expired ones.
///
/// # Returns
///
/// The number of projectiles removed.
pub fn integrate(world: &mut World, dt: f32, events: &mut Vec<CombatEvent>) -> usize {
    let mut expired = 0;
    for id in world.query(PROJECTILE_MASK) {
        let Some(view) = world.get_entity_mut(id).and_then(|e| e.projectile_mut()) else {
            trace!(entity = %id, "projectile vanished before integration");
            continue;
        };

        let velocity = view.projectile.velocity;
        view.transform.position += velocity * dt;
        view.projectile.velocity += view.projectile.acceleration * dt;
        view.projectile.lifetime -= dt;

        if view.projectile.is_expired() {
            world.remove_entity(id);
            trace!(projectile = %id, "expired");
            events.push(CombatEvent::ProjectileExpired { projectile: id });
            expired += 1;
        }
    }
    expired
}
