//! Drainage: the descent graph, lakes and flow order for one terrain state.

use crate::geometry::Mesh;

use super::config::HydrologyConfig;
use super::direction::assign_downhill;
use super::error::HydrologyError;
use super::escape::EscapeRouter;
use super::flow_order::sort_by_flow;
use super::graph::{Downhill, DownhillGraph, ReferenceAudit, Sink};
use super::observer::HydrologyObserver;
use super::ocean::classify_ocean;
use super::sinks::{resolve_sinks, sort_by_height};
use super::stats::DrainageStats;

/// Complete drainage result for one set of net elevations.
#[derive(Debug, Clone, PartialEq)]
pub struct Drainage {
    oceanic: Vec<bool>,
    graph: DownhillGraph,
    sink: Vec<Sink>,
    outlet: Vec<Option<f64>>,
    slope: Vec<f64>,
    by_height: Vec<usize>,
    by_flow: Vec<usize>,
    stats: DrainageStats,
    audit: ReferenceAudit,
}

impl Drainage {
    /// Builds the descent graph over `net` (height minus erosion).
    ///
    /// # Errors
    /// [`HydrologyError::CycleDetected`] if the graph cannot be ordered.
    pub fn compute(
        mesh: &Mesh,
        net: &[f64],
        config: &HydrologyConfig,
        observer: &mut dyn HydrologyObserver,
    ) -> Result<Self, HydrologyError> {
        assert_eq!(net.len(), mesh.len());
        let n = mesh.len();

        let mut stats = DrainageStats { points: n, ..Default::default() };

        // Step 1: ocean
        let oceanic = classify_ocean(mesh, net, config.sea_level);
        stats.oceanic = oceanic.iter().filter(|&&o| o).count();

        // Step 2: steepest descent
        let mut graph = DownhillGraph::new(n);
        let mut slope = assign_downhill(mesh, net, &oceanic, &config.scale, &mut graph, &mut stats);

        // Step 3: sinks
        let by_height = sort_by_height(net, &oceanic);
        let mut sink = resolve_sinks(mesh, &mut graph, &oceanic, &by_height);
        for (p, s) in slope.iter_mut().enumerate() {
            if graph.get(p) == Downhill::OffMap {
                *s = 0.0;
            }
        }

        // Step 4: escape routing
        let mut outlet = vec![None; n];
        EscapeRouter {
            mesh,
            net,
            oceanic: &oceanic,
            graph: &mut graph,
            sink: &mut sink,
            outlet: &mut outlet,
        }
        .run(&by_height, observer, &mut stats);

        // Step 5: audit and flow order
        let audit = graph.audit(&oceanic);
        stats.audit_mismatches = audit.mismatches.len();
        let by_flow = sort_by_flow(&graph, &oceanic, net, &sink, &by_height)?;

        log::debug!(
            "Drainage: {} points, {} oceanic, {} sinks ({} merged, {} unresolved)",
            n,
            stats.oceanic,
            stats.sink_roots,
            stats.merges,
            stats.unresolved_sinks
        );

        Ok(Self { oceanic, graph, sink, outlet, slope, by_height, by_flow, stats, audit })
    }

    pub fn len(&self) -> usize {
        self.oceanic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oceanic.is_empty()
    }

    pub fn is_oceanic(&self, p: usize) -> bool {
        self.oceanic[p]
    }

    pub fn oceanic(&self) -> &[bool] {
        &self.oceanic
    }

    pub fn downhill(&self, p: usize) -> Downhill {
        self.graph.get(p)
    }

    pub fn downhills(&self) -> &[Downhill] {
        self.graph.downhill()
    }

    pub fn graph(&self) -> &DownhillGraph {
        &self.graph
    }

    pub fn references(&self) -> &[u32] {
        self.graph.all_references()
    }

    pub fn sink(&self, p: usize) -> Sink {
        self.sink[p]
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sink
    }

    /// Elevation at which water over `p` escapes, if `p` lies in a lake basin.
    pub fn outlet(&self, p: usize) -> Option<f64> {
        self.outlet[p]
    }

    pub fn outlets(&self) -> &[Option<f64>] {
        &self.outlet
    }

    /// Slope (m/m) along the downhill edge of `p`.
    pub fn slope(&self, p: usize) -> f64 {
        self.slope[p]
    }

    pub fn slopes(&self) -> &[f64] {
        &self.slope
    }

    /// Land points, highest first.
    pub fn by_height(&self) -> &[usize] {
        &self.by_height
    }

    /// Land points, upstream before downstream.
    pub fn by_flow(&self) -> &[usize] {
        &self.by_flow
    }

    pub fn stats(&self) -> &DrainageStats {
        &self.stats
    }

    pub fn audit(&self) -> &ReferenceAudit {
        &self.audit
    }
}
