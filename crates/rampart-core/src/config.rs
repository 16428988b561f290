//! Engine configuration: defaults applied when a declaration omits an attribute.

use serde::{Deserialize, Serialize};

use lattice::{Material, MaterialEntry};

use crate::proximity::ProximityMetric;

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display name of cores without a `name`
    pub core_name: String,
    /// Core material when `material` is absent
    pub core_material: MaterialEntry,
    /// Core leak distance when `leak` is absent
    pub core_leak: i32,
    /// Destroyable completion threshold in percent when `completion` is absent
    pub destroyable_completion: f64,
    /// Proximity metric when `proximity-metric` is absent
    pub proximity_metric: ProximityMetric,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            core_name: "Core".to_string(),
            core_material: MaterialEntry::any(Material::Obsidian),
            core_leak: 5,
            destroyable_completion: 100.0,
            proximity_metric: ProximityMetric::ClosestPlayer,
        }
    }
}

impl EngineConfig {
    /// Create a config with a different default leak distance.
    #[must_use]
    pub fn with_core_leak(leak: i32) -> Self {
        Self {
            core_leak: leak,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.core_material, MaterialEntry::any(Material::Obsidian));
        assert_eq!(config.core_leak, 5);
        assert!((config.destroyable_completion - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.proximity_metric, ProximityMetric::ClosestPlayer);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "core_leak": 3, "proximity_metric": "closest-block" }"#).unwrap();
        assert_eq!(config.core_leak, 3);
        assert_eq!(config.proximity_metric, ProximityMetric::ClosestBlock);
        assert_eq!(config.core_name, "Core");
    }

    #[test]
    fn with_core_leak_keeps_other_defaults() {
        let config = EngineConfig::with_core_leak(8);
        assert_eq!(config.core_leak, 8);
        assert_eq!(config.core_material, MaterialEntry::any(Material::Obsidian));
    }
}
