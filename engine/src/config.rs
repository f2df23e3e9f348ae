use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    consts::{
        CONNECTION_TOLERANCE, GATE_FOOTPRINT, GRID_SIZE, HISTORY_CAPACITY, MAX_PASSES,
        PALETTE_WIDTH, PORT_DISTANCE, PORT_SPREAD, SMALL_FOOTPRINT,
    },
    geometry::PortGeometry,
    types::ComponentKind,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables of the workspace. Missing fields in a config file fall back to
/// the defaults in `consts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid_size: i32,
    pub port_distance: f64,
    pub port_spread: f64,
    pub connection_tolerance: f64,
    pub max_passes: usize,
    pub history_capacity: usize,
    pub palette_width: i32,
    pub small_footprint: i32,
    pub gate_footprint: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            port_distance: PORT_DISTANCE,
            port_spread: PORT_SPREAD,
            connection_tolerance: CONNECTION_TOLERANCE,
            max_passes: MAX_PASSES,
            history_capacity: HISTORY_CAPACITY,
            palette_width: PALETTE_WIDTH,
            small_footprint: SMALL_FOOTPRINT,
            gate_footprint: GATE_FOOTPRINT,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(s: &str) -> Result<SimConfig, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        SimConfig::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if !(self.connection_tolerance > 0.0) {
            return Err(ConfigError::Invalid(
                "connection_tolerance must be positive".into(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".into(),
            ));
        }
        if self.small_footprint < 0 || self.gate_footprint < 0 {
            return Err(ConfigError::Invalid("footprints can't be negative".into()));
        }
        Ok(())
    }

    pub fn geometry(&self) -> PortGeometry {
        PortGeometry::new(self.port_distance, self.port_spread)
    }

    pub fn footprint(&self, kind: ComponentKind) -> i32 {
        if kind.is_small() {
            self.small_footprint
        } else {
            self.gate_footprint
        }
    }

    /// Nearest grid line; halfway values round up, towards positive infinity.
    pub fn snap(&self, v: i32) -> i32 {
        let g = self.grid_size as f64;
        ((v as f64 / g + 0.5).floor() * g) as i32
    }

    pub fn in_palette(&self, x: i32) -> bool {
        x < self.palette_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg =
            SimConfig::from_json_str(r#"{ "max_passes": 7, "history_capacity": 3 }"#).unwrap();
        assert_eq!(cfg.max_passes, 7);
        assert_eq!(cfg.history_capacity, 3);
        assert_eq!(cfg.grid_size, GRID_SIZE);
        assert_eq!(cfg.connection_tolerance, CONNECTION_TOLERANCE);
    }

    #[test]
    fn rejects_zero_history() {
        let err = SimConfig::from_json_str(r#"{ "history_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn snapping_rounds_to_nearest_cell() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.snap(259), 240);
        assert_eq!(cfg.snap(261), 280);
        assert_eq!(cfg.snap(-19), 0);
        assert_eq!(cfg.snap(-21), -40);
    }

    #[test]
    fn snapping_halfway_rounds_up() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.snap(20), 40);
        assert_eq!(cfg.snap(-20), 0);
        assert_eq!(cfg.snap(-60), -40);
    }
}
