//! Error types for the combat core.
//!
//! Ordinary combat-time rejections (an ability on cooldown, a stale entity
//! id) are not errors at the [`CombatSystem`](crate::combat::CombatSystem)
//! surface; they are reported as `false` or skipped. The types here cover
//! the cases a caller must handle explicitly:
//!
//! - [`ComponentError`]: a programmer error such as attaching a second
//!   component of the same kind
//! - [`AbilityError`]: why an [`Ability`](crate::ability::Ability) refused
//!   to activate
//! - [`ConfigError`]: loading or validating configuration and ability data

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::ComponentKind;

/// Errors raised by component storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// A component of this kind is already attached.
    ///
    /// Each entity carries at most one component per kind.
    #[error("a {kind} component is already attached")]
    Duplicate {
        /// The kind that was attached twice.
        kind: ComponentKind,
    },
}

/// Reasons an ability refused to activate.
///
/// An ability that returns one of these has not changed any state: the
/// cooldown, the caster's energy and the caster's components are exactly
/// as they were before the call.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AbilityError {
    /// The ability is still cooling down.
    #[error("ability on cooldown ({remaining:.2}s remaining)")]
    OnCooldown {
        /// Seconds until the ability is ready again.
        remaining: f32,
    },
    /// The caster cannot pay the energy cost.
    #[error("insufficient energy: need {required}, have {available}")]
    InsufficientEnergy {
        /// Energy cost of the ability.
        required: f32,
        /// Energy the caster currently holds.
        available: f32,
    },
    /// The effect needs the caster's position but it has no transform.
    #[error("caster has no transform")]
    MissingTransform,
}

/// Errors raised while loading configuration or ability catalogs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON for the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but a value is out of range.
    #[error("invalid value: {0}")]
    Invalid(String),
    /// An ability id was requested that the catalog does not define.
    #[error("unknown ability: {0}")]
    UnknownAbility(String),
}
