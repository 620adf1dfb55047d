//! Surface hydrology over an irregular terrain mesh.
//!
//! A recompute has two halves:
//! - [`Drainage`]: ocean classification, steepest-descent directions, sink
//!   resolution, escape routing over lake rims and a flow order
//! - [`WaterFlow`]: flux accumulation, sediment transport and lake levels over
//!   that order
//!
//! Everything works on flat per-point arrays indexed like the
//! [`Mesh`](crate::geometry::Mesh).

pub mod config;
mod direction;
pub mod drainage;
mod error;
mod escape;
mod flow_order;
pub mod flux;
mod graph;
pub mod model;
mod observer;
mod ocean;
mod sinks;
mod soil;
mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{ConfigError, HydrologyConfig, WorldScale};
pub use drainage::Drainage;
pub use error::{HydrologyError, StuckPoint};
pub use flux::{FlowInputs, WaterFlow};
pub use graph::{Downhill, DownhillGraph, ReferenceAudit, ReferenceMismatch, Sink};
pub use model::{FlowClass, SECONDS_PER_YEAR};
pub use observer::{
    Escape, Flood, HydrologyObserver, LogObserver, NullObserver, RecordingObserver, Transport,
};
pub use soil::SoilType;
pub use stats::{DrainageStats, FlowStats};
