//! Physical model: velocity, sediment capacity, evapotranspiration and river
//! geometry.
//!
//! All functions are pure. Units follow [`HydrologyConfig`]: velocities in
//! m/s, flux in m^3/s, rainfall in cm/yr.

use serde::{Deserialize, Serialize};

use super::config::HydrologyConfig;
use super::soil::SoilType;

/// Length of a year in seconds.
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Velocity gained per unit slope before clamping.
const VELOCITY_PER_SLOPE: f64 = 5.0;

/// Width/depth ratio bounds for river cross-sections.
const WIDTH_DEPTH_NUMERATOR: f64 = 6.0;
const MAX_WIDTH_TO_DEPTH: f64 = 20.0;

/// Flow velocity (m/s) down a slope (m/m), clamped to `[Vmin, Vmax]`.
pub fn velocity(slope: f64, config: &HydrologyConfig) -> f64 {
    (VELOCITY_PER_SLOPE * slope).clamp(config.v_min, config.v_max)
}

/// Soil (m^3) water moving at `v` can pick up per m^3 of water.
///
/// Zero at or below the erosion threshold; grows linearly up to `Vmax`.
pub fn erosive_capacity(soil: SoilType, v: f64, config: &HydrologyConfig) -> f64 {
    if v <= config.v_erosion {
        return 0.0;
    }
    let speed = (v / config.v_max).min(1.0);
    config.erosion_coefficient * config.max_sediment * speed / soil.resistance()
}

/// Fraction of the suspended load slow water drops.
///
/// Zero at or above the erosion threshold, the full deposition coefficient at
/// or below `Vmin`, linear in between.
pub fn deposition_fraction(v: f64, config: &HydrologyConfig) -> f64 {
    if v >= config.v_erosion {
        0.0
    } else if v > config.v_min {
        config.deposition_coefficient * (config.v_erosion - v) / config.v_erosion
    } else {
        config.deposition_coefficient
    }
}

/// Relative silt load dropped by very slow water: 1 at `Vmin`, 0 at `Vd`.
pub fn silt_fraction(v: f64, config: &HydrologyConfig) -> f64 {
    let v = v.max(config.v_min);
    if v >= config.v_deposition {
        return 0.0;
    }
    (config.v_deposition - v) / (config.v_deposition - config.v_min)
}

/// Air temperature (°C) at `altitude_m` above sea level.
pub fn temperature_at(altitude_m: f64, config: &HydrologyConfig) -> f64 {
    config.mean_temp_c - config.lapse_rate_c_per_km * altitude_m.max(0.0) / 1000.0
}

/// Annual evapotranspiration (cm/yr) at `altitude_m`.
pub fn evapotranspiration(altitude_m: f64, config: &HydrologyConfig) -> f64 {
    let temp = temperature_at(altitude_m, config);
    if temp <= 0.0 {
        return 0.0;
    }
    let monthly_mm = (config.evt_multiplier * temp.ln() - config.evt_base).max(0.0);
    monthly_mm / 10.0 * 12.0 * config.evt_scale
}

/// Rain (cm/yr) left after evapotranspiration; never negative.
pub fn net_rain(rain: f64, altitude_m: f64, config: &HydrologyConfig) -> f64 {
    let lost = evapotranspiration(altitude_m, config);
    if lost < rain {
        rain - lost
    } else {
        0.0
    }
}

/// Soil moisture (m^3/m^3) where evapotranspiration takes all the rain.
///
/// The soil is soaked in proportion to how much of the demand the rain
/// meets; 0 with no rain or no demand.
pub fn dry_hydration(soil: SoilType, rain: f64, altitude_m: f64, config: &HydrologyConfig) -> f64 {
    let demand = evapotranspiration(altitude_m, config);
    if rain <= 0.0 || demand <= 0.0 {
        return 0.0;
    }
    soil.saturation() * (rain / demand).min(1.0)
}

/// Width over depth for a channel carrying water at `v`.
pub fn width_to_depth(v: f64) -> f64 {
    (WIDTH_DEPTH_NUMERATOR / v).min(MAX_WIDTH_TO_DEPTH)
}

/// Channel width (m) for `flux` moving at `v`.
pub fn river_width(flux: f64, v: f64) -> f64 {
    if flux <= 0.0 || v <= 0.0 {
        return 0.0;
    }
    (flux / v * width_to_depth(v)).sqrt()
}

/// Channel depth (m) for `flux` moving at `v`.
pub fn river_depth(flux: f64, v: f64) -> f64 {
    if flux <= 0.0 || v <= 0.0 {
        return 0.0;
    }
    (flux / v / width_to_depth(v)).sqrt()
}

/// Size class of a watercourse, by flux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlowClass {
    None,
    Stream,
    River,
    Artery,
}

impl FlowClass {
    pub fn classify(flux: f64, config: &HydrologyConfig) -> Self {
        if flux >= config.artery_flux {
            FlowClass::Artery
        } else if flux >= config.river_flux {
            FlowClass::River
        } else if flux >= config.stream_flux {
            FlowClass::Stream
        } else {
            FlowClass::None
        }
    }
}
