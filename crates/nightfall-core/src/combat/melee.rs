//! Melee resolution.
//!
//! An attacker is any living entity with Transform, Health and Attack. Its
//! gate opens at `last_attack_time + 1 / attack_speed` on the combat clock.
//! When the gate is open it strikes the first hostile target within range
//! and stops: one target per strike.

use tracing::trace;

use crate::entity::{Attack, ComponentMask, Entity};
use crate::world::World;

use super::collision::{first_target, TARGET_MASK};
use super::{apply_hit, CombatEvent, DamageKind};

/// Components every melee attacker carries.
pub const ATTACKER_MASK: ComponentMask = TARGET_MASK.union(ComponentMask::ATTACK);

/// Resolves melee strikes at simulation time `clock`.
///
/// # Returns
///
/// The number of strikes landed.
pub fn resolve(world: &mut World, clock: f64, events: &mut Vec<CombatEvent>) -> usize {
    let attackers = world.query(ATTACKER_MASK);
    let targets = world.query(TARGET_MASK);
    let mut strikes = 0;

    for attacker_id in attackers {
        let Some(striker) = world.get_entity(attacker_id).and_then(Entity::striker) else {
            trace!(attacker = %attacker_id, "stale attacker skipped");
            continue;
        };
        if !striker.health.is_alive() || !striker.attack.is_ready(clock) {
            continue;
        }
        let position = striker.transform.position;
        let range = striker.attack.range;
        let damage = striker.attack.damage;
        let faction = striker.faction;

        let Some(target_id) = first_target(world, &targets, attacker_id, None, faction, |t| {
            t.distance(position) <= range
        }) else {
            continue;
        };

        if let Some(attack) = world.get_component_mut::<Attack>(attacker_id) {
            attack.record_strike(clock);
        }
        trace!(attacker = %attacker_id, victim = %target_id, clock, "melee strike");
        apply_hit(
            world,
            target_id,
            damage,
            Some(attacker_id),
            DamageKind::Melee,
            events,
        );
        strikes += 1;
    }
    strikes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ComponentSet, Defense, EntityId, Faction, Health, Transform};
    use glam::Vec2;

    fn spawn_fighter(world: &mut World, position: Vec2, attack: Attack) -> EntityId {
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(position))
                .with(Health::new(100.0))
                .with(attack),
        )
    }

    fn spawn_dummy(world: &mut World, position: Vec2, armor: f32) -> EntityId {
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(position))
                .with(Health::new(100.0))
                .with(Defense::new(armor)),
        )
    }

    #[test]
    fn range_is_inclusive() {
        let mut world = World::new();
        spawn_fighter(&mut world, Vec2::ZERO, Attack::new(20.0, 5.0, 1.0));
        let dummy = spawn_dummy(&mut world, Vec2::new(5.0, 0.0), 0.0);

        assert_eq!(resolve(&mut world, 0.1, &mut Vec::new()), 1);
        assert_eq!(world.get_component::<Health>(dummy).unwrap().current(), 80.0);
    }

    #[test]
    fn gate_follows_attack_speed() {
        let mut world = World::new();
        let fighter = spawn_fighter(&mut world, Vec2::ZERO, Attack::new(10.0, 5.0, 2.0));
        let dummy = spawn_dummy(&mut world, Vec2::new(1.0, 0.0), 0.0);
        let mut events = Vec::new();

        assert_eq!(resolve(&mut world, 1.0, &mut events), 1);
        assert_eq!(
            world.get_component::<Attack>(fighter).unwrap().last_attack_time,
            Some(1.0)
        );
        assert_eq!(resolve(&mut world, 1.25, &mut events), 0);
        assert_eq!(resolve(&mut world, 1.5, &mut events), 1);
        assert_eq!(world.get_component::<Health>(dummy).unwrap().current(), 80.0);
    }

    #[test]
    fn strikes_only_the_first_target() {
        let mut world = World::new();
        spawn_fighter(&mut world, Vec2::ZERO, Attack::new(10.0, 5.0, 1.0));
        let near = spawn_dummy(&mut world, Vec2::new(2.0, 0.0), 0.0);
        let also_near = spawn_dummy(&mut world, Vec2::new(0.0, 2.0), 0.0);

        resolve(&mut world, 0.0, &mut Vec::new());
        assert_eq!(world.get_component::<Health>(near).unwrap().current(), 90.0);
        assert_eq!(world.get_component::<Health>(also_near).unwrap().current(), 100.0);
    }

    #[test]
    fn dead_attackers_do_not_strike() {
        let mut world = World::new();
        let fighter = world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::ZERO))
                .with(Health::with_current(0.0, 100.0))
                .with(Attack::new(10.0, 5.0, 1.0)),
        );
        let dummy = spawn_dummy(&mut world, Vec2::new(1.0, 0.0), 0.0);

        assert_eq!(resolve(&mut world, 0.0, &mut Vec::new()), 0);
        assert!(world.has_entity(fighter));
        assert_eq!(world.get_component::<Health>(dummy).unwrap().current(), 100.0);
    }

    #[test]
    fn allies_are_skipped_for_enemies_further_out() {
        let mut world = World::new();
        let fighter = world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::ZERO))
                .with(Health::new(100.0))
                .with(Attack::new(10.0, 5.0, 1.0))
                .with(Faction(1)),
        );
        let ally = world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(1.0, 0.0)))
                .with(Health::new(100.0))
                .with(Faction(1)),
        );
        let enemy = world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(4.0, 0.0)))
                .with(Health::new(100.0))
                .with(Faction(2)),
        );

        resolve(&mut world, 0.0, &mut Vec::new());
        assert!(world.has_entity(fighter));
        assert_eq!(world.get_component::<Health>(ally).unwrap().current(), 100.0);
        assert_eq!(world.get_component::<Health>(enemy).unwrap().current(), 90.0);
    }

    #[test]
    fn target_defeated_by_earlier_attacker_is_not_struck_again() {
        let mut world = World::new();
        let first = spawn_fighter(&mut world, Vec2::ZERO, Attack::new(200.0, 5.0, 1.0));
        let second = spawn_fighter(&mut world, Vec2::new(10.0, 0.0), Attack::new(200.0, 5.0, 1.0));
        let dummy = spawn_dummy(&mut world, Vec2::new(4.0, 0.0), 0.0);
        let mut events = Vec::new();

        // `first` kills the dummy; `second` has nothing left in range except `first` (10 away).
        assert_eq!(resolve(&mut world, 0.0, &mut events), 1);
        assert!(!world.has_entity(dummy));
        assert!(world.has_entity(first));
        assert!(world.has_entity(second));
        assert_eq!(
            world.get_component::<Attack>(second).unwrap().last_attack_time,
            None
        );
    }
}
