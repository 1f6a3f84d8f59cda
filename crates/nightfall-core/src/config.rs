//! Combat tunables.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```
//! use nightfall_core::config::CombatConfig;
//!
//! let config = CombatConfig::from_json_str(r#"{ "collision_radius": 20.0 }"#).unwrap();
//! assert_eq!(config.collision_radius, 20.0);
//! assert_eq!(config.max_ability_level, 10);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default projectile-vs-target hit radius, in arena units.
pub const DEFAULT_COLLISION_RADIUS: f32 = 15.0;

/// Default ability level cap.
pub const DEFAULT_MAX_ABILITY_LEVEL: u32 = 10;

/// Tunables for the [`CombatSystem`](crate::combat::CombatSystem).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// A projectile hits a target strictly closer than this.
    pub collision_radius: f32,
    /// Highest level an ability can reach.
    pub max_ability_level: u32,
}

impl CombatConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON, [`ConfigError::Invalid`] if
    /// a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
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

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if the collision radius is not a positive
    /// finite number or the level cap is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.collision_radius.is_finite() && self.collision_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "collision_radius must be positive, got {}",
                self.collision_radius
            )));
        }
        if self.max_ability_level == 0 {
            return Err(ConfigError::Invalid(
                "max_ability_level must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            collision_radius: DEFAULT_COLLISION_RADIUS,
            max_ability_level: DEFAULT_MAX_ABILITY_LEVEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = CombatConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CombatConfig::default());
    }

    #[test]
    fn rejects_non_positive_radius() {
        let err = CombatConfig::from_json_str(r#"{ "collision_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_level_cap() {
        let err = CombatConfig::from_json_str(r#"{ "max_ability_level": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = CombatConfig::from_json_str("{ collision_radius").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CombatConfig::load("/nonexistent/nightfall/combat.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
