//! Upstream-to-downstream ordering of land points.

use std::collections::VecDeque;

use super::error::{HydrologyError, StuckPoint};
use super::graph::{DownhillGraph, Sink};

/// Kahn's algorithm over the descent graph.
///
/// Works on a copy of the maintained in-degrees. The ready queue is seeded
/// with every land point nobody drains into, in `by_height` order, so the
/// result is deterministic. Every point appears before its downhill target.
pub fn sort_by_flow(
    graph: &DownhillGraph,
    oceanic: &[bool],
    net: &[f64],
    sink: &[Sink],
    by_height: &[usize],
) -> Result<Vec<usize>, HydrologyError> {
    let mut remaining = graph.all_references().to_vec();
    let mut ready: VecDeque<usize> = by_height.iter().copied().filter(|&p| remaining[p] == 0).collect();
    let mut order = Vec::with_capacity(by_height.len());
    let mut placed = vec![false; graph.len()];

    while let Some(p) = ready.pop_front() {
        order.push(p);
        placed[p] = true;

        if let Some(d) = graph.get(p).target() {
            if oceanic[d] {
                continue;
            }
            remaining[d] = remaining[d].saturating_sub(1);
            if remaining[d] == 0 {
                ready.push_back(d);
            }
        }
    }

    if order.len() == by_height.len() {
        return Ok(order);
    }

    // Whatever is left sits on (or drains into) a cycle.
    let stuck: Vec<StuckPoint> = by_height
        .iter()
        .filter(|&&p| !placed[p])
        .map(|&p| StuckPoint {
            index: p,
            net_elevation: net[p],
            downhill: graph.get(p),
            sink: sink[p],
            remaining: remaining[p],
        })
        .collect();

    for s in &stuck {
        log::error!(
            "Point {} not placed in flow order: height {:.4}, downhill {:?}, sink {:?}, {} unresolved inflows",
            s.index, s.net_elevation, s.downhill, s.sink, s.remaining
        );
    }

    let placed_count = order.len();
    let mut fallback_order = order;
    fallback_order.extend(stuck.iter().map(|s| s.index));

    Err(HydrologyError::CycleDetected {
        placed: placed_count,
        total: by_height.len(),
        stuck,
        fallback_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrology::graph::Downhill;

    fn position(order: &[usize], p: usize) -> usize {
        order.iter().position(|&q| q == p).unwrap()
    }

    #[test]
    fn test_order_is_topological() {
        // 0 -> 2 -> 3, 1 -> 2, 3 off map
        let mut graph = DownhillGraph::new(4);
        graph.point_to(0, Downhill::Point(2));
        graph.point_to(1, Downhill::Point(2));
        graph.point_to(2, Downhill::Point(3));
        graph.point_to(3, Downhill::OffMap);
        let net = [0.9, 0.8, 0.5, 0.1];
        let by_height = [0, 1, 2, 3];
        let sink = [Sink::OffMap; 4];

        let order = sort_by_flow(&graph, &[false; 4], &net, &sink, &by_height).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3]);
        for p in 0..3 {
            let d = graph.get(p).target().unwrap();
            assert!(position(&order, p) < position(&order, d));
        }
    }

    #[test]
    fn test_oceanic_targets_are_ignored() {
        let mut graph = DownhillGraph::new(3);
        graph.point_to(0, Downhill::Point(1));
        graph.point_to(1, Downhill::Point(2));
        let oceanic = [false, false, true];
        let sink = [Sink::Ocean; 3];

        let order = sort_by_flow(&graph, &oceanic, &[0.4, 0.2, -0.1], &sink, &[0, 1]).unwrap();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_cycle_is_reported_with_fallback() {
        // 0 -> 1 -> 2 -> 1
        let mut graph = DownhillGraph::new(3);
        graph.point_to(0, Downhill::Point(1));
        graph.point_to(1, Downhill::Point(2));
        graph.point_to(2, Downhill::Point(1));
        let sink = [Sink::Unknown; 3];

        let err = sort_by_flow(&graph, &[false; 3], &[0.3, 0.2, 0.1], &sink, &[0, 1, 2]).unwrap_err();
        match err {
            HydrologyError::CycleDetected { placed, total, stuck, fallback_order } => {
                assert_eq!(placed, 1);
                assert_eq!(total, 3);
                assert_eq!(stuck.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2]);
                assert_eq!(stuck[0].remaining, 1);
                assert_eq!(fallback_order, vec![0, 1, 2]);
            }
        }
    }
}
