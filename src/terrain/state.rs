//! Terrain state: mesh, per-point inputs and the last computed hydrology.

use crate::geometry::Mesh;
use crate::hydrology::{
    Drainage, FlowInputs, HydrologyConfig, HydrologyError, HydrologyObserver, NullObserver,
    SoilType, WaterFlow,
};
use crate::pipeline::{Pipeline, PipelineError};

/// Owns everything a recompute reads and everything it produces.
///
/// Inputs are edited through setters; edits that change the shape of the
/// land (heights, erosion, sea level, configuration) drop both outputs, edits
/// that only change water or soil drop the water-flow output. Nothing is
/// recomputed implicitly.
#[derive(Debug, Clone)]
pub struct TerrainState {
    mesh: Mesh,
    config: HydrologyConfig,

    heights: Vec<f64>,
    erosion: Vec<f64>,
    rainfall: Vec<f64>,
    incoming: Vec<f64>,
    sediment: Vec<f64>,
    soil: Vec<SoilType>,
    erosion_factor: Vec<f64>,
    deposition_factor: Vec<f64>,

    drainage: Option<Drainage>,
    flow: Option<WaterFlow>,
}

impl TerrainState {
    /// Creates a flat, dry, uneroded state over `mesh`.
    pub fn new(mesh: Mesh, config: HydrologyConfig) -> Self {
        let n = mesh.len();
        Self {
            mesh,
            config,
            heights: vec![0.0; n],
            erosion: vec![0.0; n],
            rainfall: vec![0.0; n],
            incoming: vec![0.0; n],
            sediment: vec![0.0; n],
            soil: vec![SoilType::default(); n],
            erosion_factor: vec![1.0; n],
            deposition_factor: vec![1.0; n],
            drainage: None,
            flow: None,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn config(&self) -> &HydrologyConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: HydrologyConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn set_sea_level(&mut self, sea_level: f64) {
        self.config.sea_level = sea_level;
        self.invalidate();
    }

    /// True when there is nothing to compute.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty() || self.heights.is_empty()
    }

    // Inputs

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn set_heights(&mut self, heights: Vec<f64>) {
        self.heights = heights;
        self.invalidate();
    }

    /// Mutable access to the height map; drops the outputs.
    pub fn heights_mut(&mut self) -> &mut [f64] {
        self.invalidate();
        &mut self.heights
    }

    pub fn erosion(&self) -> &[f64] {
        &self.erosion
    }

    pub fn rainfall(&self) -> &[f64] {
        &self.rainfall
    }

    /// Rainfall in cm/yr.
    pub fn set_rainfall(&mut self, rainfall: Vec<f64>) {
        self.rainfall = rainfall;
        self.flow = None;
    }

    pub fn incoming(&self) -> &[f64] {
        &self.incoming
    }

    /// Water entering from off the map, m^3/s.
    pub fn set_incoming(&mut self, incoming: Vec<f64>) {
        self.incoming = incoming;
        self.flow = None;
    }

    pub fn incoming_sediment(&self) -> &[f64] {
        &self.sediment
    }

    pub fn set_incoming_sediment(&mut self, sediment: Vec<f64>) {
        self.sediment = sediment;
        self.flow = None;
    }

    pub fn soil(&self) -> &[SoilType] {
        &self.soil
    }

    pub fn set_soil(&mut self, soil: Vec<SoilType>) {
        self.soil = soil;
        self.flow = None;
    }

    pub fn erosion_factor(&self) -> &[f64] {
        &self.erosion_factor
    }

    pub fn deposition_factor(&self) -> &[f64] {
        &self.deposition_factor
    }

    pub fn set_erosion_factors(&mut self, erosion: Vec<f64>, deposition: Vec<f64>) {
        self.erosion_factor = erosion;
        self.deposition_factor = deposition;
        self.flow = None;
    }

    /// Height minus erosion at `p`.
    pub fn net_elevation(&self, p: usize) -> f64 {
        self.heights[p] - self.erosion[p]
    }

    pub fn net_elevations(&self) -> Vec<f64> {
        self.heights.iter().zip(&self.erosion).map(|(h, e)| h - e).collect()
    }

    // Outputs

    pub fn drainage(&self) -> Option<&Drainage> {
        self.drainage.as_ref()
    }

    pub fn flow(&self) -> Option<&WaterFlow> {
        self.flow.as_ref()
    }

    fn invalidate(&mut self) {
        self.drainage = None;
        self.flow = None;
    }

    // Recompute

    /// Rebuilds drainage and water flow.
    pub fn recompute(&mut self) -> Result<(), PipelineError> {
        self.recompute_with(&mut NullObserver)
    }

    pub fn recompute_with(&mut self, observer: &mut dyn HydrologyObserver) -> Result<(), PipelineError> {
        if self.is_empty() {
            return Ok(());
        }
        Pipeline::full().run(self, observer)
    }

    /// Rebuilds only the water flow over the existing drainage, e.g. after a
    /// rainfall edit.
    ///
    /// # Errors
    /// [`PipelineError::MissingDependency`] when no drainage exists yet.
    pub fn recompute_flow(&mut self) -> Result<(), PipelineError> {
        self.recompute_flow_with(&mut NullObserver)
    }

    pub fn recompute_flow_with(&mut self, observer: &mut dyn HydrologyObserver) -> Result<(), PipelineError> {
        if self.is_empty() {
            return Ok(());
        }
        Pipeline::flow_only().run(self, observer)
    }

    /// Drainage pass; replaces the drainage output and drops the stale flow.
    pub(crate) fn run_drainage(&mut self, observer: &mut dyn HydrologyObserver) -> Result<(), HydrologyError> {
        let net = self.net_elevations();
        let drainage = Drainage::compute(&self.mesh, &net, &self.config, observer)?;
        self.drainage = Some(drainage);
        self.flow = None;
        Ok(())
    }

    /// Water-flow pass. Returns false if there is no drainage to run over.
    pub(crate) fn run_water_flow(&mut self, observer: &mut dyn HydrologyObserver) -> bool {
        let Some(drainage) = self.drainage.as_ref() else {
            return false;
        };
        let net = self.net_elevations();
        let inputs = FlowInputs {
            net: &net,
            erosion: &self.erosion,
            rainfall: &self.rainfall,
            incoming: &self.incoming,
            sediment: &self.sediment,
            soil: &self.soil,
            erosion_factor: &self.erosion_factor,
            deposition_factor: &self.deposition_factor,
        };
        self.flow = Some(WaterFlow::compute(&self.mesh, drainage, &inputs, &self.config, observer));
        true
    }

    // Erosion

    /// Adds the last computed elevation delta to the erosion map and drops the
    /// outputs. Returns false when there is no water flow to apply.
    pub fn apply_erosion(&mut self) -> bool {
        let Some(flow) = self.flow.take() else {
            return false;
        };
        for (e, delta) in self.erosion.iter_mut().zip(flow.elevation_delta()) {
            *e += delta;
        }
        self.invalidate();
        true
    }

    pub fn reset_erosion(&mut self) {
        self.erosion.iter_mut().for_each(|e| *e = 0.0);
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::grid_index;
    use crate::hydrology::{Sink, WorldScale};

    /// West-draining slope with enough rain and relief to erode.
    fn eroding_slope() -> TerrainState {
        let (cols, rows) = (8, 6);
        let mesh = Mesh::grid(cols, rows, 1.0);
        let mut config = HydrologyConfig::default().without_evapotranspiration();
        config.scale = WorldScale { xy_range_km: 1.0, ..WorldScale::default() };

        let mut state = TerrainState::new(mesh, config);
        for r in 0..rows {
            for c in 0..cols {
                state.heights_mut()[grid_index(cols, r, c)] = 0.1 + 0.01 * c as f64 + 0.001 * r as f64;
            }
        }
        state.set_rainfall(vec![500.0; cols * rows]);
        state
    }

    #[test]
    fn test_new_state_defaults() {
        let state = TerrainState::new(Mesh::grid(3, 3, 1.0), HydrologyConfig::default());
        assert!(state.heights().iter().all(|&h| h == 0.0));
        assert!(state.soil().iter().all(|&s| s == SoilType::Sedimentary));
        assert!(state.erosion_factor().iter().all(|&f| f == 1.0));
        assert!(state.drainage().is_none());
        assert!(state.flow().is_none());
    }

    #[test]
    fn test_empty_state_is_a_no_op() {
        let mut state = TerrainState::new(Mesh::default(), HydrologyConfig::default());
        state.recompute().unwrap();
        assert!(state.drainage().is_none());

        let mut state = TerrainState::new(Mesh::grid(3, 3, 1.0), HydrologyConfig::default());
        state.set_heights(Vec::new());
        state.recompute().unwrap();
        state.recompute_flow().unwrap();
        assert!(state.drainage().is_none());
    }

    #[test]
    fn test_recompute_populates_outputs() {
        let mut state = eroding_slope();
        state.recompute().unwrap();
        let drainage = state.drainage().unwrap();
        assert!(drainage.sinks().iter().all(|&s| s == Sink::OffMap));
        assert!(state.flow().unwrap().stats().max_flux > 0.0);
    }

    #[test]
    fn test_recompute_twice_is_identical() {
        let mut state = eroding_slope();
        state.recompute().unwrap();
        let first = (state.drainage().cloned(), state.flow().cloned());
        state.recompute().unwrap();
        assert_eq!(first, (state.drainage().cloned(), state.flow().cloned()));
    }

    #[test]
    fn test_flow_only_recompute_needs_drainage() {
        let mut state = eroding_slope();
        let err = state.recompute_flow().unwrap_err();
        assert!(matches!(err, PipelineError::MissingDependency(_, _)));

        state.recompute().unwrap();
        let before = state.flow().unwrap().stats().max_flux;

        // Rain edits keep the drainage, so the short path works.
        state.set_rainfall(vec![1000.0; state.mesh().len()]);
        assert!(state.drainage().is_some());
        assert!(state.flow().is_none());
        state.recompute_flow().unwrap();
        assert!(state.flow().unwrap().stats().max_flux > before);
    }

    #[test]
    fn test_apply_erosion_adds_last_delta() {
        let mut state = eroding_slope();
        assert!(!state.apply_erosion());

        state.recompute().unwrap();
        let delta = state.flow().unwrap().elevation_delta().to_vec();
        assert!(delta.iter().any(|&d| d > 0.0));

        assert!(state.apply_erosion());
        assert_eq!(state.erosion(), delta.as_slice());
        assert!(state.drainage().is_none());
        assert!(state.flow().is_none());

        let p = grid_index(8, 3, 4);
        assert_eq!(state.net_elevation(p), state.heights()[p] - delta[p]);

        state.reset_erosion();
        assert!(state.erosion().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_sea_level_change_drops_outputs() {
        let mut state = eroding_slope();
        state.recompute().unwrap();
        state.set_sea_level(0.2);
        assert!(state.drainage().is_none());

        state.recompute().unwrap();
        assert!(state.drainage().unwrap().stats().oceanic > 0);
    }
}
