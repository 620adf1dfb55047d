//! Escape routing: drains every closed basin over its lowest rim point.
//!
//! Each pass looks at every remaining sink root, finds the lowest way out of
//! its basin, reroutes the root's water along it and merges the basin into the
//! sink on the other side. Passes repeat until one makes no merge; whatever
//! roots are left then have no way out at all.

use crate::geometry::Mesh;

use super::graph::{Downhill, DownhillGraph, Sink};
use super::observer::{Escape, HydrologyObserver};
use super::stats::DrainageStats;

/// Lowest exit found for one basin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    height: f64,
    through: usize,
    to: usize,
}

/// Mutable drainage state the router works on.
pub struct EscapeRouter<'a> {
    pub mesh: &'a Mesh,
    pub net: &'a [f64],
    pub oceanic: &'a [bool],
    pub graph: &'a mut DownhillGraph,
    pub sink: &'a mut [Sink],
    pub outlet: &'a mut [Option<f64>],
}

impl EscapeRouter<'_> {
    /// Runs passes to a fixed point. `by_height` fixes the order members of
    /// each basin are examined in.
    pub fn run(
        &mut self,
        by_height: &[usize],
        observer: &mut dyn HydrologyObserver,
        stats: &mut DrainageStats,
    ) {
        // Step 1: gather basin members per root
        let mut basins: Vec<Vec<usize>> = vec![Vec::new(); self.mesh.len()];
        for &p in by_height {
            if let Sink::Root(root) = self.sink[p] {
                basins[root].push(p);
            }
        }
        stats.sink_roots = basins.iter().filter(|b| !b.is_empty()).count();

        // Step 2: merge until nothing moves
        loop {
            let mut merged = false;
            let mut stuck = Vec::new();

            for root in 0..basins.len() {
                if basins[root].is_empty() || self.graph.get(root) != Downhill::Unknown {
                    continue;
                }
                match self.find_escape(root, &basins[root]) {
                    Some(candidate) => {
                        let members = std::mem::take(&mut basins[root]);
                        let into = self.merge(root, members.as_slice(), candidate);
                        if let Sink::Root(other) = into {
                            basins[other].extend(members);
                        }

                        observer.escape(&Escape {
                            root,
                            through: candidate.through,
                            to: candidate.to,
                            height: candidate.height,
                            into,
                        });
                        stats.merges += 1;
                        merged = true;
                    }
                    None => stuck.push(root),
                }
            }

            if !merged {
                for root in stuck {
                    log::warn!("Sink {} at {:.4} has no escape", root, self.net[root]);
                    observer.unresolved_sink(root);
                    stats.unresolved_sinks += 1;
                }
                break;
            }
        }
    }

    /// Lowest point at which water can leave the basin of `root`.
    fn find_escape(&self, root: usize, members: &[usize]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for &inside in members {
            let z_in = self.net[inside];
            for &out in self.mesh.neighbors(inside) {
                if self.sink[out] == Sink::Root(root) {
                    continue;
                }
                let z_out = self.net[out];
                let candidate = if z_out >= z_in {
                    // Uphill neighbor: water must rise to its level.
                    Candidate { height: z_out, through: out, to: out }
                } else {
                    // Downhill neighbor: spills from the member itself.
                    Candidate { height: z_in, through: inside, to: out }
                };
                if best.map_or(true, |b| candidate.height < b.height) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Reroutes the root's water through the escape and moves the basin into
    /// the sink beyond it. Returns that sink.
    fn merge(&mut self, root: usize, members: &[usize], escape: Candidate) -> Sink {
        let Candidate { height, through, to } = escape;

        // Step 1: reroute
        if through == to {
            self.graph.point_to(root, Downhill::Point(to));
        } else {
            if through != root {
                self.graph.point_to(root, Downhill::Point(through));
            }
            self.graph.point_to(through, Downhill::Point(to));
        }

        // Step 2: move members into the sink beyond
        let into = self.sink[to];
        for &p in members {
            self.sink[p] = into;
            if self.net[p] <= height {
                self.outlet[p] = Some(height);
            }
        }

        // Step 3: an uphill escape point is the lake's rim
        if through == to && !self.oceanic[to] {
            self.outlet[to] = Some(height);
            if self.mesh.is_boundary(to) && self.graph.get(to) != Downhill::OffMap {
                self.graph.point_to(to, Downhill::OffMap);
            }
        }

        into
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::grid_index;
    use glam::DVec2;
    use crate::hydrology::config::WorldScale;
    use crate::hydrology::direction::assign_downhill;
    use crate::hydrology::observer::RecordingObserver;
    use crate::hydrology::sinks::{resolve_sinks, sort_by_height};

    struct Routed {
        graph: DownhillGraph,
        sink: Vec<Sink>,
        outlet: Vec<Option<f64>>,
        stats: DrainageStats,
        events: RecordingObserver,
    }

    fn route(mesh: &Mesh, net: &[f64]) -> Routed {
        let oceanic: Vec<bool> = net.iter().map(|&z| z < 0.0).collect();
        let mut graph = DownhillGraph::new(mesh.len());
        let mut stats = DrainageStats::default();
        assign_downhill(mesh, net, &oceanic, &WorldScale::default(), &mut graph, &mut stats);
        let by_height = sort_by_height(net, &oceanic);
        let mut sink = resolve_sinks(mesh, &mut graph, &oceanic, &by_height);
        let mut outlet = vec![None; mesh.len()];
        let mut events = RecordingObserver::default();

        EscapeRouter {
            mesh,
            net,
            oceanic: &oceanic,
            graph: &mut graph,
            sink: &mut sink,
            outlet: &mut outlet,
        }
        .run(&by_height, &mut events, &mut stats);

        Routed { graph, sink, outlet, stats, events }
    }

    #[test]
    fn test_spill_from_member_reroutes_saddle() {
        // Pit at (1,2) closed by a saddle at (1,3) that belongs to the pit's
        // basin but also touches the lower ground to the east.
        let (cols, rows) = (6, 3);
        let mesh = Mesh::grid(cols, rows, 1.0);
        let mut net = vec![0.9; mesh.len()];
        let pit = grid_index(cols, 1, 2);
        let saddle = grid_index(cols, 1, 3);
        let east = grid_index(cols, 1, 4);
        net[grid_index(cols, 1, 1)] = 0.5;
        net[pit] = 0.2;
        net[saddle] = 0.6;
        net[east] = 0.3;
        net[grid_index(cols, 1, 5)] = 0.25;

        let r = route(&mesh, &net);

        assert_eq!(r.stats.sink_roots, 1);
        assert_eq!(r.events.escapes.len(), 1);
        let e = r.events.escapes[0];
        assert_eq!((e.root, e.through, e.to), (pit, saddle, east));
        assert_eq!(e.height, 0.6);
        assert_eq!(e.into, Sink::OffMap);

        assert_eq!(r.graph.get(pit), Downhill::Point(saddle));
        assert_eq!(r.graph.get(saddle), Downhill::Point(east));
        assert!(r.sink.iter().all(|s| s.is_drained()));
        assert_eq!(r.outlet[pit], Some(0.6));
        assert_eq!(r.outlet[saddle], Some(0.6));
        assert_eq!(r.outlet[east], None);
        assert!(r.graph.audit(&vec![false; mesh.len()]).is_clean());
    }

    #[test]
    fn test_pit_ringed_by_map_edge_drains_off_map() {
        // Every edge point sits above the pit and drains into it.
        let mesh = Mesh::grid(3, 3, 1.0);
        let mut net = vec![0.5; mesh.len()];
        net[4] = 0.1;
        let r = route(&mesh, &net);

        assert_eq!(r.stats.sink_roots, 1);
        assert_eq!(r.stats.unresolved_sinks, 0);
        assert_eq!(r.events.escapes.len(), 1);
        let e = r.events.escapes[0];
        assert_eq!(e.through, e.to);
        assert!(mesh.is_boundary(e.to));
        assert_eq!(e.into, Sink::OffMap);

        assert_eq!(r.graph.get(4), Downhill::Point(e.to));
        assert_eq!(r.graph.get(e.to), Downhill::OffMap);
        assert_eq!(r.outlet[4], Some(0.5));
        assert!(r.sink.iter().all(|&s| s == Sink::OffMap));
        assert!(r.graph.audit(&vec![false; mesh.len()]).is_clean());
    }

    #[test]
    fn test_closed_mesh_leaves_basin_unresolved() {
        // Four mutually linked points: no boundary, so nowhere to spill.
        let points = vec![DVec2::ZERO, DVec2::X, DVec2::Y, DVec2::ONE];
        let neighbors = vec![vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]];
        let mesh = Mesh::new(points, neighbors);
        let net = [0.1, 0.5, 0.6, 0.7];

        let r = route(&mesh, &net);
        assert_eq!(r.stats.sink_roots, 1);
        assert_eq!(r.stats.unresolved_sinks, 1);
        assert_eq!(r.events.unresolved, vec![0]);
        assert!(r.sink.iter().all(|&s| s == Sink::Root(0)));
        assert_eq!(r.graph.get(0), Downhill::Unknown);
    }

    #[test]
    fn test_boundary_escape_point_drains_off_map() {
        // 1 and 2 are walls around pit 0; boundary point 3 sits above the pit
        // but drains into 4 until it becomes the pit's escape.
        let points = (0..5).map(|i| DVec2::new(i as f64, (i % 2) as f64)).collect();
        let neighbors = vec![vec![1, 2, 3], vec![0], vec![0], vec![0, 4], vec![3]];
        let mesh = Mesh::new(points, neighbors);
        let net = [0.1, 0.9, 0.9, 0.5, 0.05];

        let r = route(&mesh, &net);
        assert_eq!(r.events.escapes.len(), 1);
        assert_eq!(r.graph.get(0), Downhill::Point(3));
        assert_eq!(r.graph.get(3), Downhill::OffMap);
        assert_eq!(r.graph.references(4), 0);
        assert_eq!(r.outlet[3], Some(0.5));
        assert_eq!(r.outlet[0], Some(0.5));
        assert_eq!(r.outlet[1], None);
        assert_eq!(r.sink[0], Sink::OffMap);
        // Walls drain inward but stay out of the pit's basin.
        assert_eq!(r.graph.get(1), Downhill::OffMap);
        assert_eq!(r.sink[1], Sink::OffMap);
        assert!(r.graph.audit(&vec![false; mesh.len()]).is_clean());
    }
}
