//! Summary statistics for drainage and water-flow passes.

use std::fmt;

/// Figures gathered while building the descent graph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrainageStats {
    pub points: usize,
    pub oceanic: usize,
    /// Lowest and highest net elevation among land points (map units).
    pub min_height: f64,
    pub max_height: f64,
    /// Smallest non-zero and largest slope (m/m).
    pub min_slope: f64,
    pub max_slope: f64,
    /// Local depressions found before escape routing.
    pub sink_roots: usize,
    /// Basins merged by escape routing.
    pub merges: usize,
    pub unresolved_sinks: usize,
    pub audit_mismatches: usize,
}

impl DrainageStats {
    pub fn land(&self) -> usize {
        self.points - self.oceanic
    }
}

impl fmt::Display for DrainageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "points:     {} ({} land, {} oceanic)", self.points, self.land(), self.oceanic)?;
        writeln!(f, "height:     {:.4} .. {:.4}", self.min_height, self.max_height)?;
        writeln!(f, "slope:      {:.6} .. {:.6}", self.min_slope, self.max_slope)?;
        writeln!(
            f,
            "sinks:      {} found, {} merged, {} unresolved",
            self.sink_roots, self.merges, self.unresolved_sinks
        )?;
        write!(f, "refcounts:  {} mismatches", self.audit_mismatches)
    }
}

/// Figures gathered while accumulating flux.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowStats {
    /// Rainfall range over land (cm/yr).
    pub min_rain: f64,
    pub max_rain: f64,
    /// Smallest flux at or above a tenth of the stream threshold (m^3/s).
    pub min_flux: f64,
    pub max_flux: f64,
    /// Smallest edge velocity at or above Vmin (m/s).
    pub min_velocity: f64,
    pub max_velocity: f64,
    /// Deepest removal and deposition (m/yr).
    pub max_erosion: f64,
    pub max_deposition: f64,
}

impl fmt::Display for FlowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rain:       {:.1} .. {:.1} cm/yr", self.min_rain, self.max_rain)?;
        writeln!(f, "flux:       {:.4} .. {:.4} m3/s", self.min_flux, self.max_flux)?;
        writeln!(f, "velocity:   {:.4} .. {:.4} m/s", self.min_velocity, self.max_velocity)?;
        write!(
            f,
            "erosion:    {:.6} m/yr max, deposition {:.6} m/yr max",
            self.max_erosion, self.max_deposition
        )
    }
}

/// Running min/max that reports 0 for an empty range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extent {
    min: f64,
    max: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY }
    }
}

impl Extent {
    pub(crate) fn add(&mut self, value: f64) {
        self.add_min(value);
        self.add_max(value);
    }

    /// Counts `value` toward the minimum only.
    pub(crate) fn add_min(&mut self, value: f64) {
        self.min = self.min.min(value);
    }

    pub(crate) fn add_max(&mut self, value: f64) {
        self.max = self.max.max(value);
    }

    pub(crate) fn min(&self) -> f64 {
        if self.min.is_finite() { self.min } else { 0.0 }
    }

    pub(crate) fn max(&self) -> f64 {
        if self.max.is_finite() { self.max } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_extent_reports_zero() {
        let e = Extent::default();
        assert_eq!(e.min(), 0.0);
        assert_eq!(e.max(), 0.0);
    }

    #[test]
    fn test_extent_tracks_range() {
        let mut e = Extent::default();
        for v in [3.0, -1.0, 2.0] {
            e.add(v);
        }
        assert_eq!(e.min(), -1.0);
        assert_eq!(e.max(), 3.0);
    }

    #[test]
    fn test_drainage_stats_display() {
        let stats = DrainageStats { points: 10, oceanic: 4, sink_roots: 2, merges: 2, ..Default::default() };
        let text = stats.to_string();
        assert!(text.contains("6 land"));
        assert!(text.contains("2 found, 2 merged, 0 unresolved"));
    }
}
