//! Pipeline module for orchestrating recompute stages.
//!
//! Provides a trait-based architecture so a caller can rebuild everything or
//! only the water-flow pass after a rainfall edit.

mod stage;

pub use stage::{
    DrainageStage, Pipeline, PipelineError, RecomputeStage, StageId, WaterFlowStage,
};
