//! Systems configuration.

use serde::{Deserialize, Serialize};

/// Library name of the material used for meshes without a `Material` component.
pub const DEFAULT_MATERIAL: &str = "M_Default";

/// Configuration shared by the per-frame systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Fallback material name for meshes without a `Material` component.
    pub default_material: String,
}

impl UpdaterConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the fallback material name.
    #[must_use]
    pub fn with_default_material(mut self, name: impl Into<String>) -> Self {
        self.default_material = name.into();
        self
    }
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            default_material: DEFAULT_MATERIAL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_name() {
        assert_eq!(UpdaterConfig::default().default_material, "M_Default");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: UpdaterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UpdaterConfig::default());

        let config: UpdaterConfig =
            serde_json::from_str(r#"{ "default_material": "M_Debug" }"#).unwrap();
        assert_eq!(config, UpdaterConfig::new().with_default_material("M_Debug"));
    }
}
