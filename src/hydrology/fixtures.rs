//! Synthetic terrains shared by the hydrology tests.

use crate::geometry::{grid_index, Mesh};

/// Plane rising east and (slightly) south; the west edge is the low side.
pub fn tilted_plane(cols: usize, rows: usize) -> (Mesh, Vec<f64>) {
    let mesh = Mesh::grid(cols, rows, 1.0);
    let mut net = vec![0.0; mesh.len()];
    for r in 0..rows {
        for c in 0..cols {
            net[grid_index(cols, r, c)] = 0.1 + 0.01 * c as f64 + 0.001 * r as f64;
        }
    }
    (mesh, net)
}

/// 9x9 bowl centered on (4,4) with a single low gap in its rim at (4,7).
pub fn bowl_with_opening() -> (Mesh, Vec<f64>) {
    let n = 9;
    let mesh = Mesh::grid(n, n, 1.0);
    let mut net = vec![0.0; mesh.len()];
    for r in 0..n {
        for c in 0..n {
            let d = ((r as f64 - 4.0).powi(2) + (c as f64 - 4.0).powi(2)).sqrt();
            net[grid_index(n, r, c)] = if d < 2.5 {
                0.1 + 0.1 * d
            } else if d < 3.5 {
                0.8
            } else {
                0.45 - 0.05 * (d - 3.5)
            };
        }
    }
    net[grid_index(n, 4, 7)] = 0.5;
    (mesh, net)
}

/// Cone-shaped `n`x`n` bowl whose rim is the edge of the map.
pub fn bowl_against_edge(n: usize) -> (Mesh, Vec<f64>) {
    let mesh = Mesh::grid(n, n, 1.0);
    let mid = (n / 2) as f64;
    let mut net = vec![0.0; mesh.len()];
    for r in 0..n {
        for c in 0..n {
            let d = ((r as f64 - mid).powi(2) + (c as f64 - mid).powi(2)).sqrt();
            net[grid_index(n, r, c)] = 0.1 + 0.1 * d;
        }
    }
    (mesh, net)
}

/// Two basins west to east: A next to the ocean, B behind a saddle.
pub fn two_basins() -> (Mesh, Vec<f64>) {
    let (cols, rows) = (11, 5);
    let profile = [-0.1, 0.3, 0.1, 0.5, 0.2, 0.8, 0.85, 0.9, 0.95, 0.97, 1.0];
    let mesh = Mesh::grid(cols, rows, 1.0);
    let mut net = vec![0.0; mesh.len()];
    for r in 0..rows {
        for c in 0..cols {
            net[grid_index(cols, r, c)] = if c == 0 {
                -0.1
            } else if r == 0 || r == rows - 1 {
                1.0
            } else {
                profile[c] + 0.01 * (r as f64 - 2.0).abs()
            };
        }
    }
    (mesh, net)
}
