//! Synthetic height maps for demos and tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Mesh;

/// Parameters for a random landscape of rounded hills and pits on a tilted
/// base plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapConfig {
    /// Random seed for reproducible terrain.
    pub seed: u64,
    /// Height of the base plane at the low (west) edge, map units.
    pub base: f64,
    /// Rise of the base plane across the map, map units.
    pub tilt: f64,
    /// Number of bumps; roughly a third are pits.
    pub features: usize,
    /// Largest bump amplitude, map units.
    pub amplitude: f64,
    /// Largest bump radius, map units.
    pub radius: f64,
    /// Per-point random roughness, map units.
    pub roughness: f64,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base: -0.02,
            tilt: 0.2,
            features: 12,
            amplitude: 0.15,
            radius: 0.2,
            roughness: 0.005,
        }
    }
}

/// One Gaussian bump.
struct Feature {
    x: f64,
    y: f64,
    amplitude: f64,
    radius: f64,
}

/// Generates heights for every mesh point.
///
/// Assumes coordinates span roughly `[0, 1]` on both axes.
pub fn generate_heights(mesh: &Mesh, config: &HeightmapConfig) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let features: Vec<Feature> = (0..config.features)
        .map(|_| {
            let sign = if rng.random_bool(1.0 / 3.0) { -1.0 } else { 1.0 };
            Feature {
                x: rng.random_range(0.0..1.0),
                y: rng.random_range(0.0..1.0),
                amplitude: sign * config.amplitude * rng.random_range(0.3..1.0),
                radius: config.radius * rng.random_range(0.3..1.0),
            }
        })
        .collect();

    mesh.points()
        .iter()
        .map(|p| {
            let mut h = config.base + config.tilt * p.x;
            for f in &features {
                let d2 = (p.x - f.x).powi(2) + (p.y - f.y).powi(2);
                h += f.amplitude * (-d2 / (f.radius * f.radius)).exp();
            }
            if config.roughness > 0.0 {
                h += rng.random_range(-config.roughness..config.roughness);
            }
            h
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let mesh = Mesh::jittered_grid(16, 16, 1.0, 0.5, 3);
        let config = HeightmapConfig::default();
        assert_eq!(generate_heights(&mesh, &config), generate_heights(&mesh, &config));

        let other = HeightmapConfig { seed: 7, ..config };
        assert_ne!(generate_heights(&mesh, &config), generate_heights(&mesh, &other));
    }

    #[test]
    fn test_featureless_plane_follows_tilt() {
        let mesh = Mesh::grid(5, 5, 1.0);
        let config = HeightmapConfig { features: 0, roughness: 0.0, ..Default::default() };
        let heights = generate_heights(&mesh, &config);
        for (h, p) in heights.iter().zip(mesh.points()) {
            assert!((h - (config.base + config.tilt * p.x)).abs() < 1e-12);
        }
    }
}
