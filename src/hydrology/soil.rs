//! Soil classes and their resistance to erosion.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    #[default]
    Sedimentary,
    Metamorphic,
    Igneous,
    /// Loose deposits left by water.
    Alluvial,
}

impl SoilType {
    /// Divisor applied to erosive capacity; higher resists more.
    pub fn resistance(self) -> f64 {
        match self {
            SoilType::Sedimentary => 1.0,
            SoilType::Metamorphic => 4.0,
            SoilType::Igneous => 2.5,
            SoilType::Alluvial => 0.5,
        }
    }

    /// Water a fully soaked cubic meter of this soil holds (m^3).
    pub fn saturation(self) -> f64 {
        match self {
            SoilType::Sedimentary => 0.30,
            SoilType::Metamorphic => 0.15,
            SoilType::Igneous => 0.10,
            SoilType::Alluvial => 0.40,
        }
    }

    /// Soil that actually meets the water at a point: anything buried under
    /// net deposition (negative erosion) behaves as alluvium.
    pub fn surface(self, erosion: f64) -> SoilType {
        if erosion < 0.0 {
            SoilType::Alluvial
        } else {
            self
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SoilType::Sedimentary => "sedimentary",
            SoilType::Metamorphic => "metamorphic",
            SoilType::Igneous => "igneous",
            SoilType::Alluvial => "alluvial",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposits_erode_as_alluvium() {
        assert_eq!(SoilType::Igneous.surface(-0.01), SoilType::Alluvial);
        assert_eq!(SoilType::Igneous.surface(0.0), SoilType::Igneous);
        assert!(SoilType::Alluvial.resistance() < SoilType::Metamorphic.resistance());
    }

    #[test]
    fn test_loose_soil_holds_more_water() {
        assert!(SoilType::Alluvial.saturation() > SoilType::Sedimentary.saturation());
        assert!(SoilType::Igneous.saturation() < SoilType::Metamorphic.saturation());
    }
}
