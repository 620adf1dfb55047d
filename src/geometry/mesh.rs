//! Irregular planar terrain mesh.
//!
//! Points live in one flat arena; adjacency is stored as plain indices so the
//! drainage graph can refer to points without borrowing the mesh. A point with
//! fewer than [`MIN_INTERIOR_NEIGHBORS`] neighbors sits on the map boundary.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Points with fewer neighbors than this are on the edge of the map.
pub const MIN_INTERIOR_NEIGHBORS: usize = 3;

/// Read-only point arena with neighbor adjacency.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    points: Vec<DVec2>,
    neighbors: Vec<Vec<usize>>,
}

impl Mesh {
    /// Wraps externally tessellated points and their adjacency lists.
    ///
    /// `neighbors[i]` lists the indices adjacent to `points[i]`. Adjacency is
    /// trusted as given (it is expected to be symmetric).
    pub fn new(points: Vec<DVec2>, neighbors: Vec<Vec<usize>>) -> Self {
        assert_eq!(points.len(), neighbors.len());
        Self { points, neighbors }
    }

    /// Number of points in the mesh.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Coordinates of point `index` (map units).
    pub fn point(&self, index: usize) -> DVec2 {
        self.points[index]
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Indices of the points adjacent to `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    /// Returns true if `index` lies on the map boundary.
    pub fn is_boundary(&self, index: usize) -> bool {
        self.neighbors[index].len() < MIN_INTERIOR_NEIGHBORS
    }

    /// Planar distance between two points, in map units.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.points[a].distance(self.points[b])
    }

    /// Builds a regular `cols` x `rows` grid spanning `[0, extent]` on both axes.
    ///
    /// Interior points are 4-connected. Perimeter points link only to their
    /// inward neighbor (corners link diagonally), so they all have a single
    /// neighbor and count as boundary points. Index of `(row, col)` is
    /// [`grid_index`].
    pub fn grid(cols: usize, rows: usize, extent: f64) -> Self {
        assert!(cols >= 3 && rows >= 3, "grid needs at least 3x3 points");

        let dx = extent / (cols - 1) as f64;
        let dy = extent / (rows - 1) as f64;
        let idx = |r: usize, c: usize| grid_index(cols, r, c);
        let interior = |r: usize, c: usize| r > 0 && r < rows - 1 && c > 0 && c < cols - 1;

        let mut points = Vec::with_capacity(cols * rows);
        let mut neighbors = vec![Vec::new(); cols * rows];

        for r in 0..rows {
            for c in 0..cols {
                points.push(DVec2::new(c as f64 * dx, r as f64 * dy));

                let i = idx(r, c);
                if interior(r, c) {
                    neighbors[i].extend([idx(r - 1, c), idx(r + 1, c), idx(r, c - 1), idx(r, c + 1)]);
                } else {
                    // Clamp toward the interior; corners move on both axes.
                    let ir = r.clamp(1, rows - 2);
                    let ic = c.clamp(1, cols - 2);
                    neighbors[i].push(idx(ir, ic));
                }
            }
        }

        // Interior corner-adjacent points need the diagonal back-link.
        for (r, c) in [(0, 0), (0, cols - 1), (rows - 1, 0), (rows - 1, cols - 1)] {
            let corner = idx(r, c);
            let inner = idx(r.clamp(1, rows - 2), c.clamp(1, cols - 2));
            if !neighbors[inner].contains(&corner) {
                neighbors[inner].push(corner);
            }
        }

        Self { points, neighbors }
    }

    /// Same topology as [`Mesh::grid`], with interior points displaced by up to
    /// `jitter` grid spacings (deterministic for a given `seed`).
    pub fn jittered_grid(cols: usize, rows: usize, extent: f64, jitter: f64, seed: u64) -> Self {
        let mut mesh = Self::grid(cols, rows, extent);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let spacing = DVec2::new(extent / (cols - 1) as f64, extent / (rows - 1) as f64);
        for r in 1..rows - 1 {
            for c in 1..cols - 1 {
                let offset = DVec2::new(rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5));
                mesh.points[grid_index(cols, r, c)] += offset * spacing * jitter;
            }
        }

        mesh
    }
}

/// Index of `(row, col)` in a mesh built by [`Mesh::grid`].
pub const fn grid_index(cols: usize, row: usize, col: usize) -> usize {
    row * cols + col
}
