//! What an ability does when it fires.
//!
//! Effects never touch the [`World`](crate::world::World). Planning an
//! effect yields spawn blueprints plus any change to the caster itself;
//! the [`Ability`](super::Ability) commits the caster change and the
//! [`CombatSystem`](crate::combat::CombatSystem) spawns the blueprints.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{
    Attack, ComponentSet, Defense, Entity, Faction, Health, TrajectoryProjectile, Transform,
};
use crate::error::AbilityError;

/// Upper bound on projectiles in a single area burst.
pub const MAX_AREA_PROJECTILES: u32 = 256;

/// The closed set of ability effects.
///
/// Serialized with an internal `"type"` tag:
///
/// ```
/// use nightfall_core::ability::AbilityEffect;
///
/// let effect: AbilityEffect = serde_json::from_str(
///     r#"{ "type": "projectile", "speed": 300.0, "lifetime": 1.0, "damage": 15.0 }"#,
/// ).unwrap();
/// assert!(matches!(effect, AbilityEffect::Projectile { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// One projectile from the caster toward the target point.
    Projectile {
        /// Launch speed.
        speed: f32,
        /// Seconds before the projectile expires.
        lifetime: f32,
        /// Base damage.
        damage: f32,
        /// Acceleration along the flight direction. Negative values brake.
        #[serde(default)]
        acceleration: f32,
    },
    /// A stationary, short-lived hit placed toward the target, at most
    /// `reach` from the caster.
    MeleeStrike {
        /// Maximum distance from the caster.
        reach: f32,
        /// Base damage.
        damage: f32,
        /// Seconds the strike stays live.
        window: f32,
    },
    /// `count` projectiles bursting radially from the target point.
    AreaEffect {
        /// Number of projectiles.
        count: u32,
        /// Outward speed.
        speed: f32,
        /// Seconds before each projectile expires.
        lifetime: f32,
        /// Base damage per projectile.
        damage: f32,
    },
    /// Heals the caster and grants a timed armor ward.
    Buff {
        /// Health restored.
        heal: f32,
        /// Armor added while the ward lasts.
        #[serde(default)]
        ward: f32,
        /// Ward duration in seconds.
        #[serde(default)]
        duration: f32,
    },
    /// A melee minion at the target point on the caster's side.
    Summon {
        /// Minion max health.
        health: f32,
        /// Base minion melee damage.
        damage: f32,
        /// Minion melee range.
        range: f32,
        /// Minion strikes per second.
        attack_speed: f32,
        /// Minion armor.
        #[serde(default)]
        armor: f32,
    },
}

/// The outcome of planning an effect, before anything is committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EffectPlan {
    /// Entities to create.
    pub spawns: Vec<ComponentSet>,
    /// Health to restore on the caster.
    pub heal: f32,
    /// `(amount, duration)` of a ward to grant the caster.
    pub ward: Option<(f32, f32)>,
}

impl AbilityEffect {
    /// Short name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Projectile { .. } => "projectile",
            Self::MeleeStrike { .. } => "melee_strike",
            Self::AreaEffect { .. } => "area_effect",
            Self::Buff { .. } => "buff",
            Self::Summon { .. } => "summon",
        }
    }

    /// Whether planning this effect reads the caster's position.
    #[must_use]
    pub const fn needs_caster_position(&self) -> bool {
        matches!(self, Self::Projectile { .. } | Self::MeleeStrike { .. })
    }

    /// Checks that the parameters describe something that can exist.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first bad parameter.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = |name: &str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be non-negative, got {value}"))
            }
        };
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be positive, got {value}"))
            }
        };

        match *self {
            Self::Projectile {
                speed,
                lifetime,
                damage,
                acceleration,
            } => {
                non_negative("speed", speed)?;
                positive("lifetime", lifetime)?;
                non_negative("damage", damage)?;
                if acceleration.is_finite() {
                    Ok(())
                } else {
                    Err("acceleration must be finite".to_string())
                }
            }
            Self::MeleeStrike {
                reach,
                damage,
                window,
            } => {
                non_negative("reach", reach)?;
                non_negative("damage", damage)?;
                positive("window", window)
            }
            Self::AreaEffect {
                count,
                speed,
                lifetime,
                damage,
            } => {
                if count > MAX_AREA_PROJECTILES {
                    return Err(format!(
                        "count must be at most {MAX_AREA_PROJECTILES}, got {count}"
                    ));
                }
                non_negative("speed", speed)?;
                positive("lifetime", lifetime)?;
                non_negative("damage", damage)
            }
            Self::Buff {
                heal,
                ward,
                duration,
            } => {
                non_negative("heal", heal)?;
                non_negative("ward", ward)?;
                non_negative("duration", duration)
            }
            Self::Summon {
                health,
                damage,
                range,
                attack_speed,
                armor,
            } => {
                positive("health", health)?;
                non_negative("damage", damage)?;
                non_negative("range", range)?;
                non_negative("attack_speed", attack_speed)?;
                non_negative("armor", armor)
            }
        }
    }

    /// Plans the effect for `caster` aimed at `target_pos`.
    ///
    /// # Arguments
    ///
    /// * `caster` - The casting entity; read only
    /// * `target_pos` - World-space aim point
    /// * `damage_scale` - Level multiplier applied to every damage value
    ///
    /// # Errors
    ///
    /// [`AbilityError::MissingTransform`] when the effect starts at the
    /// caster and the caster has no [`Transform`].
    pub(crate) fn plan(
        &self,
        caster: &Entity,
        target_pos: Vec2,
        damage_scale: f32,
    ) -> Result<EffectPlan, AbilityError> {
        let origin = caster.get_component::<Transform>().map(|t| t.position);
        let faction = caster.get_component::<Faction>().copied();
        let source = caster.id();

        let projectile_set = |position: Vec2, direction: Vec2, flight: TrajectoryProjectile| {
            let set = ComponentSet::new()
                .with(Transform {
                    position,
                    rotation: direction.y.atan2(direction.x),
                    scale: Vec2::ONE,
                })
                .with(flight.with_source(source));
            match faction {
                Some(faction) => set.with(faction),
                None => set,
            }
        };

        let mut plan = EffectPlan::default();
        match *self {
            Self::Projectile {
                speed,
                lifetime,
                damage,
                acceleration,
            } => {
                let origin = origin.ok_or(AbilityError::MissingTransform)?;
                let direction = aim(origin, target_pos);
                let flight = TrajectoryProjectile::new(direction * speed, lifetime, damage * damage_scale)
                    .with_acceleration(direction * acceleration);
                plan.spawns.push(projectile_set(origin, direction, flight));
            }
            Self::MeleeStrike {
                reach,
                damage,
                window,
            } => {
                let origin = origin.ok_or(AbilityError::MissingTransform)?;
                let direction = aim(origin, target_pos);
                let offset = origin.distance(target_pos).min(reach);
                let flight = TrajectoryProjectile::new(Vec2::ZERO, window, damage * damage_scale);
                plan.spawns
                    .push(projectile_set(origin + direction * offset, direction, flight));
            }
            Self::AreaEffect {
                count,
                speed,
                lifetime,
                damage,
            } => {
                #[allow(clippy::cast_precision_loss)]
                let step = if count == 0 { 0.0 } else { TAU / count as f32 };
                for i in 0..count {
                    #[allow(clippy::cast_precision_loss)]
                    let direction = Vec2::from_angle(step * i as f32);
                    let flight =
                        TrajectoryProjectile::new(direction * speed, lifetime, damage * damage_scale);
                    plan.spawns.push(projectile_set(target_pos, direction, flight));
                }
            }
            Self::Buff {
                heal,
                ward,
                duration,
            } => {
                plan.heal = heal;
                if ward > 0.0 && duration > 0.0 {
                    plan.ward = Some((ward, duration));
                }
            }
            Self::Summon {
                health,
                damage,
                range,
                attack_speed,
                armor,
            } => {
                let minion = ComponentSet::new()
                    .with(Transform::at(target_pos))
                    .with(Health::new(health))
                    .with(Attack::new(damage * damage_scale, range, attack_speed))
                    .with(Defense::new(armor));
                plan.spawns.push(match faction {
                    Some(faction) => minion.with(faction),
                    None => minion,
                });
            }
        }
        Ok(plan)
    }
}

/// Unit direction from `origin` to `target`, or +X if they coincide.
fn aim(origin: Vec2, target: Vec2) -> Vec2 {
    (target - origin).try_normalize().unwrap_or(Vec2::X)
}
