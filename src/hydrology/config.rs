//! Hydrology configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or writing a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Linear conversions between map units and real-world units.
///
/// Coordinates span `xy_extent` map units across `xy_range_km` kilometers;
/// heights span `z_extent` map units across `z_range_m` meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldScale {
    /// Real-world width of the map (km).
    pub xy_range_km: f64,
    /// Real-world vertical range of the map (m).
    pub z_range_m: f64,
    /// Coordinate range in map units.
    pub xy_extent: f64,
    /// Height range in map units.
    pub z_extent: f64,
}

impl Default for WorldScale {
    fn default() -> Self {
        Self {
            xy_range_km: 500.0,
            z_range_m: 10_000.0,
            xy_extent: 1.0,
            z_extent: 1.0,
        }
    }
}

impl WorldScale {
    /// Map coordinate distance to kilometers.
    pub fn km(&self, coord: f64) -> f64 {
        coord * self.xy_range_km / self.xy_extent
    }

    /// Map height to meters.
    pub fn meters(&self, z: f64) -> f64 {
        z * self.z_range_m / self.z_extent
    }

    /// Meters to map height units.
    pub fn z(&self, meters: f64) -> f64 {
        meters * self.z_extent / self.z_range_m
    }

    /// Catchment area of one point (m^2) when `points` share the map evenly.
    pub fn area_per_point(&self, points: usize) -> f64 {
        let side_m = self.xy_range_km * 1000.0;
        side_m * side_m / points.max(1) as f64
    }
}

/// Parameters for drainage, water flow and erosion.
///
/// Units:
/// - heights and sea level: map units (see [`WorldScale`])
/// - velocities: m/s
/// - sediment coefficients: m^3 of soil per m^3 of water
/// - temperatures: °C
/// - flux thresholds: m^3/s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrologyConfig {
    pub sea_level: f64,

    // Velocity model
    /// Slowest water that still moves sediment (Vmin).
    pub v_min: f64,
    /// Velocity ceiling (Vmax).
    pub v_max: f64,
    /// Erosion/deposition threshold (Ve).
    pub v_erosion: f64,
    /// Below this velocity slow water drops silt (Vd).
    pub v_deposition: f64,

    // Sediment model
    /// Erosion coefficient (Ce).
    pub erosion_coefficient: f64,
    /// Maximum fraction of suspended load dropped per point (Cd).
    pub deposition_coefficient: f64,
    /// Silt carried per m^3 of slow water (Cs).
    pub silt_coefficient: f64,
    /// Carrying capacity per m^3 of water (Smax).
    pub max_sediment: f64,

    // Evapotranspiration: monthly_mm = multiplier * ln(temp) - base
    pub evt_multiplier: f64,
    pub evt_base: f64,
    /// Scales the annual loss (1.0 = as modeled).
    pub evt_scale: f64,
    /// Mean temperature at sea level.
    pub mean_temp_c: f64,
    pub lapse_rate_c_per_km: f64,

    /// Presumed water depth over a lake's exit point (m).
    pub exit_depth_m: f64,

    // Flux classification (consumed by renderers and exporters)
    pub stream_flux: f64,
    pub river_flux: f64,
    pub artery_flux: f64,

    pub scale: WorldScale,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.0,

            v_min: 0.005,
            v_max: 3.0,
            v_erosion: 0.5,
            v_deposition: 0.1,

            erosion_coefficient: 1.0,
            deposition_coefficient: 0.5,
            silt_coefficient: 0.0001,
            max_sediment: 0.1,

            evt_multiplier: 40.0,
            evt_base: 50.0,
            evt_scale: 1.0,
            mean_temp_c: 15.0,
            lapse_rate_c_per_km: 6.5,

            exit_depth_m: 1.0,

            stream_flux: 0.1,
            river_flux: 1.0,
            artery_flux: 10.0,

            scale: WorldScale::default(),
        }
    }
}

impl HydrologyConfig {
    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns a copy with evapotranspiration switched off.
    pub fn without_evapotranspiration(mut self) -> Self {
        self.evt_multiplier = 0.0;
        self.evt_base = 0.0;
        self
    }
}
