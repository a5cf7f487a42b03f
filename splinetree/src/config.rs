use crate::error::ConfigError;
use crate::geometry::{limits, tolerance};
use serde::{Deserialize, Serialize};

/// Per-document settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Hit radius for routed clicks, in document units.
    pub pick_radius: f32,
    /// Name objects added with an empty name `"<Kind> <id>"`.
    pub auto_name: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig { pick_radius: tolerance::EPS, auto_name: true }
    }
}

impl DocumentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !limits::in_radius_bounds(self.pick_radius) {
            return Err(ConfigError::PickRadius { got: self.pick_radius, max: limits::PICK_RADIUS_MAX });
        }
        Ok(())
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: DocumentConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: DocumentConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
