//! Ocean classification by flood fill from the map boundary.

use crate::geometry::Mesh;

/// Marks every point connected to a below-sea-level boundary point through
/// below-sea-level neighbors as oceanic.
///
/// Depressions below sea level that do not reach the boundary stay land (they
/// become lakes later). Uses an explicit stack, so deep coastlines cannot
/// overflow the call stack.
pub fn classify_ocean(mesh: &Mesh, net: &[f64], sea_level: f64) -> Vec<bool> {
    assert_eq!(net.len(), mesh.len());

    let mut oceanic = vec![false; mesh.len()];
    let mut stack = Vec::new();

    // Step 1: seed with submerged boundary points
    for p in 0..mesh.len() {
        if mesh.is_boundary(p) && net[p] < sea_level {
            oceanic[p] = true;
            stack.push(p);
        }
    }

    // Step 2: spread through submerged neighbors
    while let Some(p) = stack.pop() {
        for &n in mesh.neighbors(p) {
            if !oceanic[n] && net[n] < sea_level {
                oceanic[n] = true;
                stack.push(n);
            }
        }
    }

    oceanic
}
