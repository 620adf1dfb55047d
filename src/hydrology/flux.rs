//! Water flow: flux accumulation, sediment transport and lake levels.
//!
//! Walks the drainage flow order once, carrying water and suspended sediment
//! from every land point to its downhill target. Erosion is reported as an
//! elevation delta; nothing here mutates the terrain.
//!
//! Hydration is the soil moisture left at each point, in m^3 of water per
//! m^3 of soil. Submerged points report the negative water depth over them
//! instead, in map units.

use crate::geometry::Mesh;

use super::config::HydrologyConfig;
use super::drainage::Drainage;
use super::model::{self, FlowClass, SECONDS_PER_YEAR};
use super::observer::{Flood, HydrologyObserver, Transport};
use super::soil::SoilType;
use super::stats::{Extent, FlowStats};

/// Per-point inputs to the water-flow pass.
#[derive(Debug, Clone, Copy)]
pub struct FlowInputs<'a> {
    /// Net elevation (height minus erosion), map units.
    pub net: &'a [f64],
    /// Accumulated erosion, map units (negative = net deposition).
    pub erosion: &'a [f64],
    /// Rainfall, cm/yr.
    pub rainfall: &'a [f64],
    /// Water entering from outside the map, m^3/s.
    pub incoming: &'a [f64],
    /// Sediment entering from outside the map, m^3/s.
    pub sediment: &'a [f64],
    pub soil: &'a [SoilType],
    /// Exaggeration applied to removal when turning it into a height change.
    pub erosion_factor: &'a [f64],
    /// Exaggeration applied to deposition.
    pub deposition_factor: &'a [f64],
}

/// Results of one water-flow pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterFlow {
    flux: Vec<f64>,
    velocity: Vec<f64>,
    suspended: Vec<f64>,
    removal: Vec<f64>,
    silt: Vec<f64>,
    elevation_delta: Vec<f64>,
    water_level: Vec<Option<f64>>,
    hydration: Vec<f64>,
    area: f64,
    stats: FlowStats,
}

impl WaterFlow {
    /// Runs the pass over an existing drainage result.
    pub fn compute(
        mesh: &Mesh,
        drainage: &Drainage,
        inputs: &FlowInputs<'_>,
        config: &HydrologyConfig,
        observer: &mut dyn HydrologyObserver,
    ) -> Self {
        let n = mesh.len();
        assert_eq!(drainage.len(), n);
        assert_eq!(inputs.net.len(), n);

        let scale = &config.scale;
        let area = scale.area_per_point(n);
        let rain_to_flow = 0.01 * area / SECONDS_PER_YEAR;

        let mut flux = vec![0.0; n];
        let mut velocity = vec![0.0f64; n];
        let mut removal = vec![0.0; n];
        let mut hydration = vec![0.0; n];
        let mut suspended = inputs.sediment.to_vec();

        let mut rain = Extent::default();
        let mut flux_range = Extent::default();
        let mut edge_speed = Extent::default();
        let flux_floor = config.stream_flux / 10.0;

        // Step 1: carry water and sediment downstream
        for &p in drainage.by_flow() {
            rain.add(inputs.rainfall[p]);

            let altitude_m = scale.meters(inputs.net[p] - config.sea_level);
            let net_rain = model::net_rain(inputs.rainfall[p], altitude_m, config);
            flux[p] += inputs.incoming[p] + rain_to_flow * net_rain;
            let soil = inputs.soil[p].surface(inputs.erosion[p]);
            if flux[p] <= 0.0 {
                flux[p] = 0.0;
                hydration[p] = model::dry_hydration(soil, inputs.rainfall[p], altitude_m, config);
                continue;
            }
            hydration[p] = soil.saturation();
            flux_range.add_max(flux[p]);
            if flux[p] >= flux_floor {
                flux_range.add_min(flux[p]);
            }

            let Some(d) = drainage.downhill(p).target() else {
                continue;
            };
            flux[d] += flux[p];

            let own = model::velocity(drainage.slope(p), config);
            velocity[d] = velocity[d].max(own);
            let v = (velocity[p] + velocity[d]) / 2.0;
            edge_speed.add_max(v);
            if v >= config.v_min {
                edge_speed.add_min(v);
            }

            let capacity = config.max_sediment * flux[p];
            let mut eroded = 0.0;
            let mut deposited = 0.0;
            if v >= config.v_erosion {
                if drainage.outlet(p).is_none() && suspended[p] < capacity {
                    let can_take = model::erosive_capacity(soil, v, config) * flux[p];
                    eroded = can_take.min(capacity - suspended[p]);
                    removal[p] += eroded;
                }
            } else if suspended[p] > 0.0 {
                deposited = model::deposition_fraction(v, config) * suspended[p];
                removal[p] -= deposited;
            }

            let carried = suspended[p] + eroded - deposited;
            suspended[d] += carried;

            observer.transport(&Transport {
                from: p,
                to: d,
                flux: flux[p],
                velocity: v,
                eroded,
                deposited,
                suspended: carried,
            });
        }

        // Step 2: silt settling out of slow water
        let mut silt = vec![0.0; n];
        for &p in drainage.by_flow() {
            if removal[p] == 0.0 && flux[p] > 0.0 && velocity[p] <= config.v_deposition {
                silt[p] = model::silt_fraction(velocity[p], config) * flux[p] * config.silt_coefficient;
            }
        }

        let mut flow = Self {
            flux,
            velocity,
            suspended,
            removal,
            silt,
            elevation_delta: vec![0.0; n],
            water_level: vec![None; n],
            hydration,
            area,
            stats: FlowStats::default(),
        };

        // Step 3: height change
        let mut worst_erosion: f64 = 0.0;
        let mut worst_deposition: f64 = 0.0;
        for p in 0..n {
            let eroded_m = flow.erosion(p);
            let deposited_m = flow.sedimentation(p);
            worst_erosion = worst_erosion.max(eroded_m);
            worst_deposition = worst_deposition.max(deposited_m);
            flow.elevation_delta[p] = scale.z(eroded_m) * inputs.erosion_factor[p]
                - scale.z(deposited_m) * inputs.deposition_factor[p];
        }

        // Step 4: lake surfaces
        let exit_depth = scale.z(config.exit_depth_m);
        for p in 0..n {
            if drainage.is_oceanic(p) {
                flow.water_level[p] = Some(config.sea_level);
                flow.hydration[p] = inputs.net[p] - config.sea_level;
            } else if let Some(outlet) = drainage.outlet(p) {
                let level = if inputs.net[p] < outlet { outlet } else { inputs.net[p] + exit_depth };
                observer.flood(&Flood { index: p, level, outlet });
                flow.water_level[p] = Some(level);
                flow.hydration[p] = inputs.net[p] - level;
            }
        }

        flow.stats = FlowStats {
            min_rain: rain.min(),
            max_rain: rain.max(),
            min_flux: flux_range.min(),
            max_flux: flux_range.max(),
            min_velocity: edge_speed.min(),
            max_velocity: edge_speed.max(),
            max_erosion: worst_erosion,
            max_deposition: worst_deposition,
        };

        log::debug!(
            "Water flow: max flux {:.4} m3/s, max erosion {:.3e} m/yr, max deposition {:.3e} m/yr",
            flow.stats.max_flux,
            flow.stats.max_erosion,
            flow.stats.max_deposition
        );

        flow
    }

    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Water leaving each point (m^3/s).
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Fastest inflow velocity arriving at each point (m/s).
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Sediment arriving at each point (m^3/s).
    pub fn suspended(&self) -> &[f64] {
        &self.suspended
    }

    /// Soil picked up (positive) or dropped (negative) at each point (m^3/s).
    pub fn removal(&self) -> &[f64] {
        &self.removal
    }

    /// Height change to apply (map units, positive = lowered).
    pub fn elevation_delta(&self) -> &[f64] {
        &self.elevation_delta
    }

    pub fn water_level(&self, p: usize) -> Option<f64> {
        self.water_level[p]
    }

    pub fn water_levels(&self) -> &[Option<f64>] {
        &self.water_level
    }

    /// Soil moisture (m^3/m^3) on dry land, negative water depth (map
    /// units) under lakes and the ocean.
    pub fn hydration(&self) -> &[f64] {
        &self.hydration
    }

    pub fn stats(&self) -> &FlowStats {
        &self.stats
    }

    /// Catchment area of one point (m^2).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Depth of soil removed at `p` per year (m); 0 where depositing.
    pub fn erosion(&self, p: usize) -> f64 {
        if self.removal[p] > 0.0 {
            self.removal[p] * SECONDS_PER_YEAR / self.area
        } else {
            0.0
        }
    }

    /// Depth of material laid down at `p` per year (m), silt included.
    pub fn sedimentation(&self, p: usize) -> f64 {
        if self.removal[p] < 0.0 {
            -self.removal[p] * SECONDS_PER_YEAR / self.area
        } else {
            self.silt[p] * SECONDS_PER_YEAR / self.area
        }
    }

    /// Channel width at `p` (m).
    pub fn river_width(&self, p: usize) -> f64 {
        model::river_width(self.flux[p], self.velocity[p])
    }

    /// Channel depth at `p` (m).
    pub fn river_depth(&self, p: usize) -> f64 {
        model::river_depth(self.flux[p], self.velocity[p])
    }

    pub fn class(&self, p: usize, config: &HydrologyConfig) -> FlowClass {
        FlowClass::classify(self.flux[p], config)
    }
}
