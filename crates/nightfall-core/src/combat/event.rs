//! Records of what a combat tick did.
//!
//! Events carry ids only. An id in an event may already be stale by the
//! time an observer reads it (a defeated target is removed in the same
//! tick), so observers must not assume it still resolves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// How damage was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// A projectile collision.
    Projectile,
    /// A melee strike.
    Melee,
}

/// Something that happened during a tick, in resolution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A target lost health.
    DamageDealt {
        /// The responsible entity: the projectile's source or the melee
        /// attacker. `None` for unowned projectiles.
        source: Option<EntityId>,
        /// The entity hit.
        target: EntityId,
        /// Health removed, after armor.
        amount: f32,
        /// Delivery.
        kind: DamageKind,
    },
    /// A target's health reached zero and it was removed.
    EntityDefeated {
        /// The removed entity.
        entity: EntityId,
        /// Who landed the final hit, if known.
        by: Option<EntityId>,
    },
    /// A projectile ran out of lifetime.
    ProjectileExpired {
        /// The removed projectile.
        projectile: EntityId,
    },
    /// An ability fired.
    AbilityUsed {
        /// The casting entity.
        caster: EntityId,
        /// The ability's id.
        ability: String,
        /// Entities created by the effect.
        spawned: Vec<EntityId>,
    },
}

impl fmt::Display for DamageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Projectile => f.write_str("projectile"),
            Self::Melee => f.write_str("melee"),
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DamageDealt {
                source,
                target,
                amount,
                kind,
            } => match source {
                Some(source) => write!(f, "{source} hit {target} for {amount:.1} ({kind})"),
                None => write!(f, "{target} took {amount:.1} ({kind})"),
            },
            Self::EntityDefeated { entity, by } => match by {
                Some(by) => write!(f, "{entity} defeated by {by}"),
                None => write!(f, "{entity} defeated"),
            },
            Self::ProjectileExpired { projectile } => write!(f, "{projectile} expired"),
            Self::AbilityUsed {
                caster,
                ability,
                spawned,
            } => write!(f, "{caster} used {ability} ({} spawned)", spawned.len()),
        }
    }
}
