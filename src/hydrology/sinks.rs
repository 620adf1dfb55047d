//! Height ordering and sink resolution.

use crate::geometry::Mesh;

use super::graph::{Downhill, DownhillGraph, Sink};

/// Land point indices sorted by descending net elevation, ties by index.
pub fn sort_by_height(net: &[f64], oceanic: &[bool]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..net.len()).filter(|&p| !oceanic[p]).collect();
    order.sort_by(|&a, &b| net[b].total_cmp(&net[a]).then(a.cmp(&b)));
    order
}

/// Finds the sink every point drains into.
///
/// `by_height` is scanned from its lowest end so that each downhill target,
/// being strictly lower, already has its sink when its upstream points are
/// reached. Oceanic points are `Ocean` and boundary points are `OffMap`;
/// interior points without a downhill edge are their own root.
///
/// A boundary point never joins an interior basin. If its steepest edge
/// leads into a basin that has no way out yet, the edge is rewired off the
/// map so that no escape can later route that basin back through it.
pub fn resolve_sinks(mesh: &Mesh, graph: &mut DownhillGraph, oceanic: &[bool], by_height: &[usize]) -> Vec<Sink> {
    let mut sink: Vec<Sink> = oceanic
        .iter()
        .map(|&o| if o { Sink::Ocean } else { Sink::Unknown })
        .collect();

    for &p in by_height.iter().rev() {
        if sink[p] != Sink::Unknown {
            continue;
        }
        if mesh.is_boundary(p) {
            if let Downhill::Point(d) = graph.get(p) {
                if !sink[d].is_drained() {
                    graph.point_to(p, Downhill::OffMap);
                }
            }
            sink[p] = Sink::OffMap;
            continue;
        }
        sink[p] = match graph.get(p) {
            Downhill::Point(d) if oceanic[d] => Sink::Ocean,
            Downhill::Point(d) => sink[d],
            _ => Sink::Root(p),
        };
    }

    sink
}
