//! Injected trace hooks for drainage and water-flow events.
//!
//! The core never logs from its inner loops; callers that want a trace of
//! escapes, sediment transport or flooding pass an observer instead.

use super::graph::Sink;

/// A sink basin found a way out and merged into another sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escape {
    /// Lowest point of the basin that escaped.
    pub root: usize,
    /// Saddle point the water leaves through (equals `to` when the saddle
    /// lies outside the basin).
    pub through: usize,
    /// First point outside the basin.
    pub to: usize,
    /// Elevation at which the basin overflows.
    pub height: f64,
    /// Sink the basin merged into.
    pub into: Sink,
}

/// Water and sediment moving along one downhill edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    pub from: usize,
    pub to: usize,
    /// m^3/s leaving `from`.
    pub flux: f64,
    /// Mean edge velocity (m/s).
    pub velocity: f64,
    /// Soil picked up at `from` (m^3/s).
    pub eroded: f64,
    /// Soil dropped at `from` (m^3/s).
    pub deposited: f64,
    /// Suspended load arriving at `to` from this edge (m^3/s).
    pub suspended: f64,
}

/// A point that lies under a lake surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flood {
    pub index: usize,
    pub level: f64,
    pub outlet: f64,
}

/// Receives hydrology events. Every hook defaults to a no-op.
pub trait HydrologyObserver {
    fn escape(&mut self, _event: &Escape) {}

    /// A sink root for which no escape could be found.
    fn unresolved_sink(&mut self, _root: usize) {}

    fn transport(&mut self, _event: &Transport) {}

    fn flood(&mut self, _event: &Flood) {}
}

/// Ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl HydrologyObserver for NullObserver {}

/// Forwards events to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl HydrologyObserver for LogObserver {
    fn escape(&mut self, e: &Escape) {
        if e.through == e.to {
            log::trace!(
                "Sink {} escapes to {} ({:?}) at {:.4}",
                e.root, e.to, e.into, e.height
            );
        } else {
            log::trace!(
                "Sink {} escapes to {} ({:?}) through saddle {} at {:.4}",
                e.root, e.to, e.into, e.through, e.height
            );
        }
    }

    fn unresolved_sink(&mut self, root: usize) {
        log::trace!("Sink {} has no escape", root);
    }

    fn transport(&mut self, e: &Transport) {
        log::trace!(
            "{} -> {}: flux {:.4} m3/s, v {:.3} m/s, eroded {:.3e}, deposited {:.3e}, suspended {:.3e}",
            e.from, e.to, e.flux, e.velocity, e.eroded, e.deposited, e.suspended
        );
    }

    fn flood(&mut self, e: &Flood) {
        log::trace!("Point {} under water at {:.4} (outlet {:.4})", e.index, e.level, e.outlet);
    }
}

/// Collects every event; handy for inspecting a run.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub escapes: Vec<Escape>,
    pub unresolved: Vec<usize>,
    pub transports: Vec<Transport>,
    pub floods: Vec<Flood>,
}

impl HydrologyObserver for RecordingObserver {
    fn escape(&mut self, event: &Escape) {
        self.escapes.push(*event);
    }

    fn unresolved_sink(&mut self, root: usize) {
        self.unresolved.push(root);
    }

    fn transport(&mut self, event: &Transport) {
        self.transports.push(*event);
    }

    fn flood(&mut self, event: &Flood) {
        self.floods.push(*event);
    }
}
