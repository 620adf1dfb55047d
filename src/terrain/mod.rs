//! Terrain state module.
//!
//! Provides [`TerrainState`], the owner of per-point terrain inputs and of the
//! hydrology computed from them, plus synthetic height maps.

mod heightmap;
mod state;

pub use heightmap::{generate_heights, HeightmapConfig};
pub use state::TerrainState;
