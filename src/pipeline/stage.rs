//! Recompute stage trait and pipeline orchestration.

use thiserror::Error;

use crate::hydrology::{HydrologyError, HydrologyObserver};
use crate::terrain::TerrainState;

/// Unique identifier for recompute stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Ocean, flow directions, sinks, escapes and flow order.
    Drainage,
    /// Flux, sediment transport and lake levels.
    WaterFlow,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Drainage => "drainage",
            StageId::WaterFlow => "water_flow",
        }
    }

    /// True if `state` already holds this stage's output.
    fn is_available(&self, state: &TerrainState) -> bool {
        match self {
            StageId::Drainage => state.drainage().is_some(),
            StageId::WaterFlow => state.flow().is_some(),
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error(transparent)]
    Hydrology(#[from] HydrologyError),
}

/// A single step of a recompute.
pub trait RecomputeStage {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs whose output this stage reads.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, replacing its output on `state`.
    fn execute(
        &self,
        state: &mut TerrainState,
        observer: &mut dyn HydrologyObserver,
    ) -> Result<(), PipelineError>;
}

/// Runs recompute stages in order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn RecomputeStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Drainage followed by water flow.
    pub fn full() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(DrainageStage).add_stage(WaterFlowStage);
        pipeline
    }

    /// Water flow over the drainage already on the state.
    pub fn flow_only() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(WaterFlowStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: RecomputeStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order.
    ///
    /// A dependency is met if it ran earlier in this run or its output is
    /// already on the state.
    pub fn run(
        &self,
        state: &mut TerrainState,
        observer: &mut dyn HydrologyObserver,
    ) -> Result<(), PipelineError> {
        self.run_with_callbacks(state, observer, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        state: &mut TerrainState,
        observer: &mut dyn HydrologyObserver,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) && !dep.is_available(state) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(state, observer)?;
            completed.push(stage.id());
            log::debug!("Stage '{}' complete ({}/{})", stage.name(), i + 1, total);

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Rebuilds the descent graph, lakes and flow order.
pub struct DrainageStage;

impl RecomputeStage for DrainageStage {
    fn id(&self) -> StageId {
        StageId::Drainage
    }

    fn name(&self) -> &str {
        "Drainage"
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        observer: &mut dyn HydrologyObserver,
    ) -> Result<(), PipelineError> {
        state.run_drainage(observer)?;
        Ok(())
    }
}

/// Accumulates flux and sediment over the current drainage.
pub struct WaterFlowStage;

impl RecomputeStage for WaterFlowStage {
    fn id(&self) -> StageId {
        StageId::WaterFlow
    }

    fn name(&self) -> &str {
        "Water Flow"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Drainage]
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        observer: &mut dyn HydrologyObserver,
    ) -> Result<(), PipelineError> {
        if !state.run_water_flow(observer) {
            return Err(PipelineError::MissingDependency(
                self.name().to_string(),
                StageId::Drainage.name().to_string(),
            ));
        }
        Ok(())
    }
}
