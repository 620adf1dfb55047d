//! Steepest-descent flow directions.

use crate::geometry::Mesh;

use super::config::WorldScale;
use super::graph::{Downhill, DownhillGraph};
use super::stats::{DrainageStats, Extent};

/// Points each land point at its lowest strictly-lower neighbor.
///
/// Oceanic neighbors are valid targets. On ties the first neighbor in
/// adjacency order wins. Boundary points with no lower neighbor drain off the
/// map; interior ones are left `Unknown` and become sink roots. Returns the
/// slope (m/m) along each chosen edge, 0 elsewhere.
pub fn assign_downhill(
    mesh: &Mesh,
    net: &[f64],
    oceanic: &[bool],
    scale: &WorldScale,
    graph: &mut DownhillGraph,
    stats: &mut DrainageStats,
) -> Vec<f64> {
    let mut slope = vec![0.0; mesh.len()];
    let mut heights = Extent::default();
    let mut slopes = Extent::default();

    for p in 0..mesh.len() {
        if oceanic[p] {
            continue;
        }
        heights.add(net[p]);

        let mut lowest: Option<usize> = None;
        for &n in mesh.neighbors(p) {
            let floor = lowest.map_or(net[p], |l| net[l]);
            if net[n] < floor {
                lowest = Some(n);
            }
        }

        match lowest {
            Some(n) => {
                graph.point_to(p, Downhill::Point(n));

                let dz = scale.meters(net[p] - net[n]);
                let dist = scale.km(mesh.distance(p, n)) * 1000.0;
                if dist > 0.0 {
                    slope[p] = (dz / dist).abs();
                }
                if slope[p] > 0.0 {
                    slopes.add(slope[p]);
                }
            }
            None if mesh.is_boundary(p) => graph.point_to(p, Downhill::OffMap),
            None => {}
        }
    }

    stats.min_height = heights.min();
    stats.max_height = heights.max();
    stats.min_slope = slopes.min();
    stats.max_slope = slopes.max();

    slope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::grid_index;

    #[test]
    fn test_picks_lowest_neighbor_and_counts_reference() {
        let (cols, rows) = (5, 5);
        let mesh = Mesh::grid(cols, rows, 1.0);
        let mut net = vec![0.5; mesh.len()];
        let center = grid_index(cols, 2, 2);
        net[center] = 0.4;
        net[grid_index(cols, 1, 2)] = 0.3;
        net[grid_index(cols, 2, 3)] = 0.2;

        let oceanic = vec![false; mesh.len()];
        let mut graph = DownhillGraph::new(mesh.len());
        let mut stats = DrainageStats::default();
        let slope = assign_downhill(&mesh, &net, &oceanic, &WorldScale::default(), &mut graph, &mut stats);

        assert_eq!(graph.get(center), Downhill::Point(grid_index(cols, 2, 3)));
        // 0.2 map units = 2000 m over 0.25 map units = 125 km
        assert!((slope[center] - 2000.0 / 125_000.0).abs() < 1e-12);
        assert!(graph.references(grid_index(cols, 2, 3)) >= 1);
        assert_eq!(stats.min_height, 0.2);
        assert_eq!(stats.max_height, 0.5);
    }

    #[test]
    fn test_flat_points_stay_unknown_or_drain_off_map() {
        let mesh = Mesh::grid(4, 4, 1.0);
        let net = vec![0.5; mesh.len()];
        let oceanic = vec![false; mesh.len()];
        let mut graph = DownhillGraph::new(mesh.len());
        let mut stats = DrainageStats::default();
        assign_downhill(&mesh, &net, &oceanic, &WorldScale::default(), &mut graph, &mut stats);

        for p in 0..mesh.len() {
            let expected = if mesh.is_boundary(p) { Downhill::OffMap } else { Downhill::Unknown };
            assert_eq!(graph.get(p), expected);
        }
        assert_eq!(stats.min_slope, 0.0);
    }

    #[test]
    fn test_oceanic_points_get_no_edge() {
        let mesh = Mesh::grid(4, 4, 1.0);
        let mut net = vec![0.5; mesh.len()];
        net[0] = -1.0;
        let mut oceanic = vec![false; mesh.len()];
        oceanic[0] = true;
        let mut graph = DownhillGraph::new(mesh.len());
        let mut stats = DrainageStats::default();
        assign_downhill(&mesh, &net, &oceanic, &WorldScale::default(), &mut graph, &mut stats);

        assert_eq!(graph.get(0), Downhill::Unknown);
        // The corner's inner neighbor drains into the ocean.
        assert_eq!(graph.get(grid_index(4, 1, 1)), Downhill::Point(0));
    }
}
