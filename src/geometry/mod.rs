//! Planar mesh geometry module.
//!
//! Provides the point arena and adjacency the hydrology works over, along with
//! regular and jittered grid builders.

mod mesh;

pub use mesh::{grid_index, Mesh, MIN_INTERIOR_NEIGHBORS};
