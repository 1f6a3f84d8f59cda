//! Data-driven ability definitions.
//!
//! A catalog is a JSON document listing ability definitions:
//!
//! ```json
//! {
//!   "abilities": [
//!     {
//!       "id": "magic_bolt",
//!       "name": "Magic Bolt",
//!       "cooldown": 0.8,
//!       "cost": 10.0,
//!       "effect": { "type": "projectile", "speed": 300.0, "lifetime": 1.0, "damage": 15.0 }
//!     }
//!   ]
//! }
//! ```
//!
//! Definitions are validated on load, so anything handed out by
//! [`AbilityCatalog::instantiate`] is well formed.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Ability, AbilityEffect};
use crate::error::ConfigError;

/// One ability definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    /// Stable identifier.
    pub id: String,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Seconds between activations.
    pub cooldown: f32,
    /// Energy paid per activation.
    #[serde(default)]
    pub cost: f32,
    /// What the ability does.
    pub effect: AbilityEffect,
}

impl AbilityDef {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the ability and the bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |what: String| ConfigError::Invalid(format!("ability `{}`: {what}", self.id));

        if self.id.is_empty() {
            return Err(ConfigError::Invalid("ability with empty id".to_string()));
        }
        if !(self.cooldown.is_finite() && self.cooldown >= 0.0) {
            return Err(invalid(format!(
                "cooldown must be non-negative, got {}",
                self.cooldown
            )));
        }
        if !(self.cost.is_finite() && self.cost >= 0.0) {
            return Err(invalid(format!("cost must be non-negative, got {}", self.cost)));
        }
        self.effect.validate().map_err(invalid)
    }

    /// Builds a fresh, ready, level-1 ability from this definition.
    #[must_use]
    pub fn instantiate(&self) -> Ability {
        let ability = Ability::new(self.id.clone(), self.cooldown, self.cost, self.effect);
        match &self.name {
            Some(name) => ability.with_name(name.clone()),
            None => ability,
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    abilities: Vec<AbilityDef>,
}

/// A validated set of ability definitions, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityCatalog {
    defs: Vec<AbilityDef>,
}

impl AbilityCatalog {
    /// Builds a catalog from definitions, validating each.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] on a bad definition or a repeated id.
    pub fn from_defs(defs: Vec<AbilityDef>) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();
        for def in &defs {
            def.validate()?;
            if !seen.insert(def.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate ability id `{}`",
                    def.id
                )));
            }
        }
        Ok(Self { defs })
    }

    /// Parses and validates a catalog document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON, otherwise as
    /// [`from_defs`](Self::from_defs).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_defs(file.abilities)
    }

    /// Reads, parses and validates a catalog file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AbilityDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    /// Builds a fresh ability from the definition `id`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownAbility`] if no such definition exists.
    pub fn instantiate(&self, id: &str) -> Result<Ability, ConfigError> {
        self.get(id)
            .map(AbilityDef::instantiate)
            .ok_or_else(|| ConfigError::UnknownAbility(id.to_string()))
    }

    /// Builds one ability per id, in the given order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownAbility`] for the first id not in the catalog.
    pub fn instantiate_all(&self, ids: &[&str]) -> Result<Vec<Ability>, ConfigError> {
        ids.iter().map(|id| self.instantiate(id)).collect()
    }

    /// Iterates definitions in file order.
    pub fn iter(&self) -> impl Iterator<Item = &AbilityDef> + '_ {
        self.defs.iter()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
