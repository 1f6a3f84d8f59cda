//! Plain-data components for combat entities.
//!
//! Components hold state only. Behavior that spans several entities lives
//! in the [`combat`](crate::combat) pipeline; the methods here are the
//! local invariants of each component (clamping, timers, mitigation).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::TIME_EPSILON;

// =============================================================================
// Transform
// =============================================================================

/// Position, rotation and scale in the 2D arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position in arena units.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Per-axis scale.
    pub scale: Vec2,
}

impl Transform {
    /// Creates a transform at `position` with no rotation and unit scale.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Hit points.
///
/// # Invariants
///
/// `0 <= current <= max` holds after construction and after every call to
/// [`take_damage`](Self::take_damage) or [`heal`](Self::heal), whatever the
/// input. Negative amounts are treated as zero.
///
/// # Example
///
/// ```
/// use nightfall_core::entity::Health;
///
/// let mut health = Health::new(50.0);
/// health.take_damage(80.0);
/// assert_eq!(health.current(), 0.0);
/// health.heal(500.0);
/// assert_eq!(health.current(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates full health with the given maximum.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Creates health with an explicit current value, clamped into `[0, max]`.
    #[must_use]
    pub fn with_current(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Returns `true` while current health is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Fraction of maximum health remaining, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Subtracts `amount` and returns the remaining health.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        self.current
    }

    /// Adds `amount`, capped at maximum, and returns the new health.
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.current = (self.current + amount.max(0.0)).clamp(0.0, self.max);
        self.current
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

// =============================================================================
// Energy
// =============================================================================

/// Resource pool that ability costs are paid from.
///
/// Same clamping rules as [`Health`]. An entity without an `Energy`
/// component pays nothing for abilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    current: f32,
    max: f32,
}

impl Energy {
    /// Creates a full pool with the given maximum.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Creates a pool with an explicit current value, clamped into `[0, max]`.
    #[must_use]
    pub fn with_current(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    /// Energy currently available.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Pool capacity.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Returns `true` if `cost` can be paid.
    #[must_use]
    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Pays `cost` if affordable. Returns `false` and leaves the pool
    /// untouched otherwise.
    pub fn spend(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current = (self.current - cost.max(0.0)).clamp(0.0, self.max);
        true
    }

    /// Refills by `amount`, capped at maximum.
    pub fn restore(&mut self, amount: f32) -> f32 {
        self.current = (self.current + amount.max(0.0)).clamp(0.0, self.max);
        self.current
    }
}

impl Default for Energy {
    fn default() -> Self {
        Self::new(100.0)
    }
}

// =============================================================================
// Attack
// =============================================================================

/// Melee attack capability.
///
/// `last_attack_time` is a timestamp on the combat clock, not a countdown.
/// It stays `None` until the first strike, so a fresh attacker may strike
/// immediately. Timestamps are `f64` like the clock itself, so the gate
/// keeps its resolution over long sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Damage before armor mitigation.
    pub damage: f32,
    /// Maximum distance to a target, inclusive.
    pub range: f32,
    /// Strikes per second.
    pub attack_speed: f32,
    /// Clock time of the most recent strike.
    pub last_attack_time: Option<f64>,
}

impl Attack {
    /// Creates an attack that has never struck.
    #[must_use]
    pub const fn new(damage: f32, range: f32, attack_speed: f32) -> Self {
        Self {
            damage,
            range,
            attack_speed,
            last_attack_time: None,
        }
    }

    /// Seconds between strikes. Infinite when `attack_speed <= 0`.
    #[must_use]
    pub fn interval(&self) -> f32 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            f32::INFINITY
        }
    }

    /// Rate-limit gate: `clock >= last_attack_time + interval`.
    #[must_use]
    pub fn is_ready(&self, clock: f64) -> bool {
        if self.attack_speed <= 0.0 {
            return false;
        }
        match self.last_attack_time {
            None => true,
            Some(last) => {
                clock + f64::from(TIME_EPSILON) >= last + f64::from(self.interval())
            }
        }
    }

    /// Records a strike at `clock`.
    pub fn record_strike(&mut self, clock: f64) {
        self.last_attack_time = Some(clock);
    }
}

impl Default for Attack {
    fn default() -> Self {
        Self::new(10.0, 1.0, 1.0)
    }
}

// =============================================================================
// Defense
// =============================================================================

/// Flat damage mitigation.
///
/// `ward` is a temporary armor bonus granted by buffs; it lapses when
/// `ward_remaining` runs out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    /// Flat reduction applied to every incoming hit.
    pub armor: f32,
    /// Fractional magic resistance. Carried for content; not applied by the
    /// physical damage pipeline.
    pub resistance: f32,
    /// Temporary armor bonus.
    pub ward: f32,
    /// Seconds left on the ward.
    pub ward_remaining: f32,
}

impl Defense {
    /// Creates a defense with the given armor and no resistance.
    #[must_use]
    pub const fn new(armor: f32) -> Self {
        Self {
            armor,
            resistance: 0.0,
            ward: 0.0,
            ward_remaining: 0.0,
        }
    }

    /// Armor including any active ward.
    #[must_use]
    pub fn effective_armor(&self) -> f32 {
        self.armor + self.ward
    }

    /// Damage left after armor: `max(0, raw - armor)`.
    #[must_use]
    pub fn mitigate(&self, raw: f32) -> f32 {
        (raw - self.effective_armor()).max(0.0)
    }

    /// Grants a ward, replacing any current one. A duration that is not
    /// a positive finite number grants nothing.
    pub fn grant_ward(&mut self, amount: f32, duration: f32) {
        if !(duration.is_finite() && duration > 0.0) {
            return;
        }
        self.ward = amount.max(0.0);
        self.ward_remaining = duration;
    }

    /// Counts down the ward and clears it when it lapses.
    pub fn tick_ward(&mut self, dt: f32) {
        if self.ward_remaining <= 0.0 {
            return;
        }
        self.ward_remaining -= dt;
        if self.ward_remaining <= TIME_EPSILON {
            self.ward = 0.0;
            self.ward_remaining = 0.0;
        }
    }
}

impl Default for Defense {
    fn default() -> Self {
        Self::new(5.0)
    }
}

/// Mitigated damage against an optional defense.
///
/// Targets without a [`Defense`] take the raw amount (floored at zero).
#[must_use]
pub fn mitigated_damage(raw: f32, defense: Option<&Defense>) -> f32 {
    defense.map_or(raw.max(0.0), |d| d.mitigate(raw))
}

// =============================================================================
// TrajectoryProjectile
// =============================================================================

/// Kinematic state of an in-flight projectile.
///
/// Projectiles are transient: they are destroyed when `lifetime` runs out
/// or on their first collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryProjectile {
    /// Units per second.
    pub velocity: Vec2,
    /// Units per second squared.
    pub acceleration: Vec2,
    /// Seconds until expiry.
    pub lifetime: f32,
    /// Damage before armor mitigation.
    pub damage: f32,
    /// Entity that fired the projectile. Never hit by it.
    pub source: Option<EntityId>,
}

impl TrajectoryProjectile {
    /// Creates an unaccelerated projectile with no source.
    #[must_use]
    pub const fn new(velocity: Vec2, lifetime: f32, damage: f32) -> Self {
        Self {
            velocity,
            acceleration: Vec2::ZERO,
            lifetime,
            damage,
            source: None,
        }
    }

    /// Sets a constant acceleration.
    #[must_use]
    pub const fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Records the firing entity.
    #[must_use]
    pub const fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns `true` once the lifetime has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.lifetime <= TIME_EPSILON
    }
}

impl Default for TrajectoryProjectile {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 5.0, 1.0)
    }
}

// =============================================================================
// Faction
// =============================================================================

/// Team tag. Entities sharing a faction never damage each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Faction(pub u16);

impl Faction {
    /// Returns `true` if an entity of faction `a` may damage one of
    /// faction `b`. Entities without a faction are hostile to everyone.
    #[must_use]
    pub fn is_hostile(a: Option<Self>, b: Option<Self>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }
}
