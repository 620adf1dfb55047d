//! Drainage, lake and erosion modeling over irregular terrain meshes.
//!
//! This crate computes, for every point of a planar terrain mesh, where its
//! water goes, which depressions hold lakes and at what level, how much water
//! passes through, and how much soil it moves.

pub mod geometry;
pub mod hydrology;
pub mod pipeline;
pub mod terrain;

pub use geometry::Mesh;
pub use hydrology::{
    Downhill, Drainage, DrainageStats, FlowClass, FlowStats, HydrologyConfig, HydrologyError,
    HydrologyObserver, LogObserver, NullObserver, Sink, SoilType, WaterFlow, WorldScale,
};
pub use pipeline::{Pipeline, PipelineError, RecomputeStage, StageId};
pub use terrain::{generate_heights, HeightmapConfig, TerrainState};
