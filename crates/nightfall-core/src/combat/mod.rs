//! The combat system and its per-tick pipeline.
//!
//! [`CombatSystem::update`] runs a fixed sequence of stages against a
//! [`World`] passed in by the caller:
//!
//! 1. **Cooldowns**: tick every registered ability; drop registrations whose
//!    owner is gone; decay armor wards
//! 2. **Kinematics**: integrate projectiles and remove expired ones
//!    ([`kinematics`])
//! 3. **Collision**: resolve projectile hits ([`collision`])
//! 4. **Melee**: resolve melee strikes ([`melee`])
//!
//! Ability use ([`CombatSystem::use_ability`]) is an entry point called by
//! input or AI code between updates.
//!
//! # Iteration safety
//!
//! Every stage walks an id snapshot taken at the start of the stage and
//! re-resolves each id before touching it. An entity removed earlier in the
//! same stage (a target killed by a previous projectile, say) simply fails
//! to resolve and is skipped.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightfall_core::combat::CombatSystem;
//! use nightfall_core::entity::{Attack, ComponentSet, Defense, Health, Transform};
//! use nightfall_core::world::World;
//!
//! let mut world = World::new();
//! let mut combat = CombatSystem::new();
//!
//! world.spawn(
//!     ComponentSet::new()
//!         .with(Transform::at(Vec2::ZERO))
//!         .with(Health::new(100.0))
//!         .with(Attack::new(20.0, 5.0, 1.0)),
//! );
//! let dummy = world.spawn(
//!     ComponentSet::new()
//!         .with(Transform::at(Vec2::new(3.0, 0.0)))
//!         .with(Health::new(100.0))
//!         .with(Defense::new(5.0)),
//! );
//!
//! combat.update(&mut world, 1.0 / 60.0);
//! assert_eq!(world.get_component::<Health>(dummy).unwrap().current(), 85.0);
//! ```

pub mod collision;
pub mod event;
pub mod kinematics;
pub mod melee;

use std::collections::BTreeMap;

use glam::Vec2;
use tracing::{debug, info, trace, trace_span, warn};

use crate::ability::Ability;
use crate::config::CombatConfig;
use crate::entity::{ComponentKind, Defense, EntityId};
use crate::world::World;

pub use event::{CombatEvent, DamageKind};

/// Fixed timestep for callers that drive the simulation at 60 Hz.
pub const FIXED_DT: f32 = 1.0 / 60.0;

// =============================================================================
// CombatSystem
// =============================================================================

/// Orchestrates ability cooldowns, projectiles and melee.
///
/// The system owns ability registrations, the simulation clock and the
/// pending event log. It owns no entities: the [`World`] is passed to every
/// call.
#[derive(Debug, Clone, Default)]
pub struct CombatSystem {
    config: CombatConfig,
    abilities: BTreeMap<EntityId, Vec<Ability>>,
    clock: f64,
    tick: u64,
    events: Vec<CombatEvent>,
}

impl CombatSystem {
    /// Creates a combat system with default tunables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a combat system with the given tunables.
    #[must_use]
    pub fn with_config(config: CombatConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active tunables.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Seconds of simulation time elapsed, accumulated as `f64`.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Number of completed updates.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Binds `abilities` to `entity`, replacing any earlier registration.
    ///
    /// Indices into `abilities` are the indices accepted by
    /// [`use_ability`](Self::use_ability).
    pub fn register_entity_abilities(&mut self, entity: EntityId, abilities: Vec<Ability>) {
        debug!(entity = %entity, count = abilities.len(), "registered abilities");
        self.abilities.insert(entity, abilities);
    }

    /// The abilities registered to `entity`.
    #[must_use]
    pub fn abilities(&self, entity: EntityId) -> Option<&[Ability]> {
        self.abilities.get(&entity).map(Vec::as_slice)
    }

    /// Raises the level of one registered ability, up to the configured cap.
    ///
    /// # Returns
    ///
    /// `true` if the level changed.
    pub fn level_up_ability(&mut self, entity: EntityId, index: usize) -> bool {
        let cap = self.config.max_ability_level;
        self.abilities
            .get_mut(&entity)
            .and_then(|list| list.get_mut(index))
            .is_some_and(|ability| ability.level_up(cap))
    }

    /// Drops every registration and any undrained events.
    pub fn cleanup(&mut self) {
        self.abilities.clear();
        self.events.clear();
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Ability use
    // -------------------------------------------------------------------------

    /// Activates ability `index` of `caster`, aimed at `target_pos`.
    ///
    /// Validation runs in order (caster exists and is active, caster has
    /// registered abilities, index in bounds, ability usable) and nothing
    /// changes unless all of it passes. On success the effect's blueprints
    /// are spawned into `world`.
    ///
    /// # Returns
    ///
    /// `true` if the ability fired.
    pub fn use_ability(
        &mut self,
        world: &mut World,
        caster: EntityId,
        index: usize,
        target_pos: Vec2,
    ) -> bool {
        let Some(entity) = world.get_entity_mut(caster).filter(|e| e.is_active()) else {
            debug!(caster = %caster, "ability use by missing caster");
            return false;
        };
        let Some(list) = self.abilities.get_mut(&caster) else {
            debug!(caster = %caster, "caster has no registered abilities");
            return false;
        };
        let Some(ability) = list.get_mut(index) else {
            debug!(caster = %caster, index, "ability index out of range");
            return false;
        };

        let blueprints = match ability.activate(entity, target_pos) {
            Ok(blueprints) => blueprints,
            Err(err) => {
                debug!(
                    caster = %caster,
                    ability = ability.id(),
                    effect = ability.effect().label(),
                    %err,
                    "ability rejected"
                );
                return false;
            }
        };

        let ability_id = ability.id().to_string();
        let spawned: Vec<EntityId> = blueprints.into_iter().map(|set| world.spawn(set)).collect();
        trace!(caster = %caster, ability = %ability_id, spawned = spawned.len(), "ability used");
        self.events.push(CombatEvent::AbilityUsed {
            caster,
            ability: ability_id,
            spawned,
        });
        true
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    /// Runs one tick of the pipeline.
    ///
    /// The clock advances by `dt` before any stage runs, so melee gates
    /// compare against the end-of-tick time. A negative or non-finite `dt`
    /// is ignored.
    pub fn update(&mut self, world: &mut World, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            warn!(dt, "ignoring invalid timestep");
            return;
        }
        let span = trace_span!("combat_tick", tick = self.tick);
        let _enter = span.enter();

        self.clock += f64::from(dt);
        self.update_cooldowns(world, dt);
        kinematics::integrate(world, dt, &mut self.events);
        collision::resolve(world, self.config.collision_radius, &mut self.events);
        melee::resolve(world, self.clock, &mut self.events);
        self.tick += 1;
    }

    fn update_cooldowns(&mut self, world: &mut World, dt: f32) {
        self.abilities.retain(|entity, abilities| {
            if !world.has_entity(*entity) {
                debug!(entity = %entity, "dropping abilities of removed entity");
                return false;
            }
            for ability in abilities.iter_mut() {
                ability.update(dt);
            }
            true
        });

        for id in world.get_entities_with_component(ComponentKind::Defense) {
            if let Some(defense) = world.get_component_mut::<Defense>(id) {
                defense.tick_ward(dt);
            }
        }
    }
}

/// Applies `raw` damage to `target` after armor, removing it if defeated.
///
/// Records a damage event when any health is lost and a defeat event when
/// the target is removed. Does nothing if `target` no longer resolves.
pub(crate) fn apply_hit(
    world: &mut World,
    target: EntityId,
    raw: f32,
    source: Option<EntityId>,
    kind: DamageKind,
    events: &mut Vec<CombatEvent>,
) {
    let Some(mut view) = world.get_entity_mut(target).and_then(|e| e.target_mut()) else {
        trace!(victim = %target, "stale target skipped");
        return;
    };
    let amount = view.apply_damage(raw);
    let defeated = !view.health.is_alive();

    if amount > 0.0 {
        trace!(victim = %target, amount, remaining = view.health.current(), %kind, "damage");
        events.push(CombatEvent::DamageDealt {
            source,
            target,
            amount,
            kind,
        });
    }
    if defeated {
        world.remove_entity(target);
        info!(entity = %target, %kind, "entity defeated");
        events.push(CombatEvent::EntityDefeated {
            entity: target,
            by: source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityEffect;
    use crate::entity::{Attack, ComponentSet, Energy, Health, TrajectoryProjectile, Transform};

    fn bolt() -> Ability {
        Ability::new(
            "bolt",
            1.0,
            10.0,
            AbilityEffect::Projectile {
                speed: 200.0,
                lifetime: 2.0,
                damage: 10.0,
                acceleration: 0.0,
            },
        )
    }

    fn spawn_caster(world: &mut World) -> EntityId {
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::ZERO))
                .with(Health::new(100.0))
                .with(Energy::new(25.0)),
        )
    }

    mod use_ability_tests {
        use super::*;

        #[test]
        fn spawns_blueprints_and_records_event() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);

            assert!(combat.use_ability(&mut world, caster, 0, Vec2::new(100.0, 0.0)));
            assert_eq!(world.entity_count(), 2);

            let events = combat.drain_events();
            let [CombatEvent::AbilityUsed { caster: c, ability, spawned }] = events.as_slice() else {
                panic!("unexpected events: {events:?}");
            };
            assert_eq!(*c, caster);
            assert_eq!(ability, "bolt");
            assert_eq!(
                world.get_component::<TrajectoryProjectile>(spawned[0]).unwrap().source,
                Some(caster)
            );
        }

        #[test]
        fn unregistered_caster_is_rejected() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);

            assert!(!combat.use_ability(&mut world, caster, 0, Vec2::X));
            assert_eq!(world.entity_count(), 1);
        }

        #[test]
        fn bad_index_has_no_side_effects() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);

            assert!(!combat.use_ability(&mut world, caster, 3, Vec2::X));
            assert_eq!(world.get_component::<Energy>(caster).unwrap().current(), 25.0);
            assert!(combat.abilities(caster).unwrap()[0].is_ready());
            assert!(combat.events().is_empty());
        }

        #[test]
        fn removed_caster_is_rejected() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);
            world.remove_entity(caster);

            assert!(!combat.use_ability(&mut world, caster, 0, Vec2::X));
            assert!(world.is_empty());
        }

        #[test]
        fn energy_runs_out() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            let no_cooldown = Ability::new("bolt", 0.0, 10.0, *bolt().effect());
            combat.register_entity_abilities(caster, vec![no_cooldown]);

            assert!(combat.use_ability(&mut world, caster, 0, Vec2::X));
            assert!(combat.use_ability(&mut world, caster, 0, Vec2::X));
            assert!(!combat.use_ability(&mut world, caster, 0, Vec2::X));
            assert_eq!(world.get_component::<Energy>(caster).unwrap().current(), 5.0);
        }
    }

    mod update_tests {
        use super::*;

        #[test]
        fn clock_and_tick_advance() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            for _ in 0..3 {
                combat.update(&mut world, 0.5);
            }
            assert_eq!(combat.tick(), 3);
            assert!((combat.clock() - 1.5).abs() < 1e-6);
        }

        #[test]
        fn melee_keeps_pace_on_long_sessions() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            combat.clock = 600_000.0;
            world.spawn(
                ComponentSet::new()
                    .with(Transform::at(Vec2::ZERO))
                    .with(Health::new(100.0))
                    .with(Attack::new(1.0, 5.0, 1.0)),
            );
            let dummy = world.spawn(
                ComponentSet::new()
                    .with(Transform::at(Vec2::new(2.0, 0.0)))
                    .with(Health::new(1000.0))
                    .with(Defense::new(0.0)),
            );

            for _ in 0..600 {
                combat.update(&mut world, FIXED_DT);
            }

            assert!((combat.clock() - 600_010.0).abs() < 1e-3);
            // One strike per second over ten seconds.
            assert_eq!(world.get_component::<Health>(dummy).unwrap().current(), 990.0);
        }

        #[test]
        fn invalid_dt_is_ignored() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            combat.update(&mut world, -1.0);
            combat.update(&mut world, f32::NAN);
            assert_eq!(combat.tick(), 0);
            assert_eq!(combat.clock(), 0.0);
        }

        #[test]
        fn registrations_of_removed_entities_are_pruned() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);

            world.remove_entity(caster);
            combat.update(&mut world, FIXED_DT);
            assert!(combat.abilities(caster).is_none());
        }

        #[test]
        fn cooldowns_tick_during_update() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);

            assert!(combat.use_ability(&mut world, caster, 0, Vec2::X));
            combat.update(&mut world, 0.5);
            assert!((combat.abilities(caster).unwrap()[0].remaining() - 0.5).abs() < 1e-6);
            combat.update(&mut world, 0.5);
            assert!(combat.abilities(caster).unwrap()[0].is_ready());
        }

        #[test]
        fn wards_decay_during_update() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let mut defense = Defense::new(2.0);
            defense.grant_ward(6.0, 1.0);
            let id = world.spawn(ComponentSet::new().with(defense));

            combat.update(&mut world, 0.6);
            assert_eq!(world.get_component::<Defense>(id).unwrap().effective_armor(), 8.0);
            combat.update(&mut world, 0.6);
            assert_eq!(world.get_component::<Defense>(id).unwrap().effective_armor(), 2.0);
        }

        #[test]
        fn level_up_respects_config_cap() {
            let mut world = World::new();
            let mut combat = CombatSystem::with_config(CombatConfig {
                max_ability_level: 2,
                ..CombatConfig::default()
            });
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);

            assert!(combat.level_up_ability(caster, 0));
            assert!(!combat.level_up_ability(caster, 0));
            assert!(!combat.level_up_ability(caster, 5));
            assert_eq!(combat.abilities(caster).unwrap()[0].level(), 2);
        }

        #[test]
        fn cleanup_drops_registrations_and_events() {
            let mut world = World::new();
            let mut combat = CombatSystem::new();
            let caster = spawn_caster(&mut world);
            combat.register_entity_abilities(caster, vec![bolt()]);
            combat.use_ability(&mut world, caster, 0, Vec2::X);

            combat.cleanup();
            assert!(combat.abilities(caster).is_none());
            assert!(combat.events().is_empty());
            assert!(!combat.use_ability(&mut world, caster, 0, Vec2::X));
        }
    }
}
