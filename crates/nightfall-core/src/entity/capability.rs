//! Capability views: typed joins over an entity's components.
//!
//! Each view exists only when every component it needs is attached, so a
//! system that holds a view never has to re-check for missing pieces.
//! Optional extras (defense, faction) ride along as `Option`s.

use super::components::{Attack, Defense, Faction, Health, TrajectoryProjectile, Transform};
use super::{Entity, EntityId};

/// Something that can be hit: Transform + Health.
#[derive(Debug, Clone, Copy)]
pub struct Combatant<'a> {
    /// Owning entity.
    pub id: EntityId,
    /// Where it stands.
    pub transform: &'a Transform,
    /// Its hit points.
    pub health: &'a Health,
    /// Armor, if any.
    pub defense: Option<&'a Defense>,
    /// Team, if any.
    pub faction: Option<Faction>,
}

/// Something that can strike in melee: Transform + Health + Attack.
#[derive(Debug, Clone, Copy)]
pub struct Striker<'a> {
    /// Owning entity.
    pub id: EntityId,
    /// Where it stands.
    pub transform: &'a Transform,
    /// Its hit points.
    pub health: &'a Health,
    /// Its attack.
    pub attack: &'a Attack,
    /// Team, if any.
    pub faction: Option<Faction>,
}

/// Read view of a projectile: Transform + TrajectoryProjectile.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileView<'a> {
    /// Owning entity.
    pub id: EntityId,
    /// Current position.
    pub transform: &'a Transform,
    /// Flight state.
    pub projectile: &'a TrajectoryProjectile,
    /// Team, if any.
    pub faction: Option<Faction>,
}

/// Mutable view of a projectile for integration.
#[derive(Debug)]
pub struct ProjectileMut<'a> {
    /// Owning entity.
    pub id: EntityId,
    /// Current position.
    pub transform: &'a mut Transform,
    /// Flight state.
    pub projectile: &'a mut TrajectoryProjectile,
}

/// Mutable view of a damage target: Transform + Health, with Health writable.
#[derive(Debug)]
pub struct TargetMut<'a> {
    /// Owning entity.
    pub id: EntityId,
    /// Where it stands.
    pub transform: &'a Transform,
    /// Its hit points.
    pub health: &'a mut Health,
    /// Armor, if any.
    pub defense: Option<&'a Defense>,
}

impl TargetMut<'_> {
    /// Applies `raw` damage after armor. Returns the damage actually dealt.
    pub fn apply_damage(&mut self, raw: f32) -> f32 {
        let amount = super::mitigated_damage(raw, self.defense);
        if amount > 0.0 {
            self.health.take_damage(amount);
        }
        amount
    }
}

impl Entity {
    /// Transform + Health.
    #[must_use]
    pub fn combatant(&self) -> Option<Combatant<'_>> {
        let set = &self.components;
        Some(Combatant {
            id: self.id,
            transform: set.transform.as_ref()?,
            health: set.health.as_ref()?,
            defense: set.defense.as_ref(),
            faction: set.faction,
        })
    }

    /// Transform + Health + Attack.
    #[must_use]
    pub fn striker(&self) -> Option<Striker<'_>> {
        let set = &self.components;
        Some(Striker {
            id: self.id,
            transform: set.transform.as_ref()?,
            health: set.health.as_ref()?,
            attack: set.attack.as_ref()?,
            faction: set.faction,
        })
    }

    /// Transform + TrajectoryProjectile.
    #[must_use]
    pub fn projectile(&self) -> Option<ProjectileView<'_>> {
        let set = &self.components;
        Some(ProjectileView {
            id: self.id,
            transform: set.transform.as_ref()?,
            projectile: set.trajectory.as_ref()?,
            faction: set.faction,
        })
    }

    /// Mutable Transform + TrajectoryProjectile.
    pub fn projectile_mut(&mut self) -> Option<ProjectileMut<'_>> {
        let set = &mut self.components;
        Some(ProjectileMut {
            id: self.id,
            transform: set.transform.as_mut()?,
            projectile: set.trajectory.as_mut()?,
        })
    }

    /// Transform + mutable Health.
    pub fn target_mut(&mut self) -> Option<TargetMut<'_>> {
        let set = &mut self.components;
        Some(TargetMut {
            id: self.id,
            transform: set.transform.as_ref()?,
            health: set.health.as_mut()?,
            defense: set.defense.as_ref(),
        })
    }
}
