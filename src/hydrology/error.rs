//! Hydrology errors.

use thiserror::Error;

use super::graph::{Downhill, Sink};

/// Diagnostics for a land point the flow-order sort could not place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StuckPoint {
    pub index: usize,
    pub net_elevation: f64,
    pub downhill: Downhill,
    pub sink: Sink,
    /// In-degree left when the sort ran out of ready points.
    pub remaining: u32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydrologyError {
    /// The descent graph contains a cycle, so no flow order exists.
    ///
    /// `fallback_order` holds the placed prefix followed by the remaining land
    /// points in height order, for callers that prefer to carry on.
    #[error("Flow order cycle: placed {placed} of {total} land points, {} stuck", .stuck.len())]
    CycleDetected {
        placed: usize,
        total: usize,
        stuck: Vec<StuckPoint>,
        fallback_order: Vec<usize>,
    },
}
