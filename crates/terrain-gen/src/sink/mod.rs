//! The terrain surface that receives generated grids.
//!
//! The generators never own the final terrain. They read and write through
//! these traits, so the same pipeline can drive an engine terrain or the
//! in-memory [`MemoryTerrain`] used by tests and the command-line driver.

mod memory;

pub use memory::{MemoryTerrain, TerrainSize};

use serde::{Deserialize, Serialize};

use crate::errors::RegionError;
use crate::grid::{HeightGrid, SplatWeightGrid};

/// Read-only height and slope queries.
pub trait TerrainSampler {
    /// Side length of the square heightmap.
    fn height_resolution(&self) -> usize;

    /// Stored heightmap extent as `(width, height)`.
    fn height_dimensions(&self) -> (usize, usize) {
        let resolution = self.height_resolution();
        (resolution, resolution)
    }

    /// World-space height at a heightmap index. Indices past the edge clamp.
    fn sample_height_at(&self, ix: usize, iy: usize) -> f64;

    /// Surface steepness in degrees (0 = flat, towards 90 = vertical) at
    /// normalized coordinates in `[0, 1]`.
    fn sample_slope_degrees_at(&self, nx: f64, ny: f64) -> f64;
}

/// Extent of the texture weight grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphamapDimensions {
    pub width: usize,
    pub height: usize,
    pub layers: usize,
}

/// Grid storage for heights and texture weights.
pub trait TerrainSink: TerrainSampler {
    /// Reads a sub-rectangle of normalized heights.
    fn get_height_region(
        &self,
        x0: i64,
        y0: i64,
        width: usize,
        height: usize,
    ) -> Result<HeightGrid, RegionError>;

    /// Writes a sub-rectangle of normalized heights.
    fn set_height_region(
        &mut self,
        x0: i64,
        y0: i64,
        heights: &HeightGrid,
    ) -> Result<(), RegionError>;

    fn alphamap_dimensions(&self) -> AlphamapDimensions;

    /// Writes texture weights in one bulk call.
    fn set_alpha_weights(
        &mut self,
        x0: usize,
        y0: usize,
        weights: &SplatWeightGrid,
    ) -> Result<(), RegionError>;
}
