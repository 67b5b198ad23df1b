//! In-memory terrain sink.

use serde::{Deserialize, Serialize};

use super::{AlphamapDimensions, TerrainSampler, TerrainSink};
use crate::config::SPLAT_LAYERS;
use crate::errors::{ConfigError, RegionError};
use crate::grid::{HeightGrid, SplatWeightGrid};

/// World-space extent of the terrain, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSize {
    /// Extent along x.
    pub width: f64,
    /// Height of a cell whose normalized value is 1.
    pub height: f64,
    /// Extent along y (world z).
    pub length: f64,
}

impl Default for TerrainSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            length: 1000.0,
        }
    }
}

/// A terrain held entirely in memory.
///
/// Heights are stored normalized; [`TerrainSampler::sample_height_at`]
/// scales them by [`TerrainSize::height`].
#[derive(Debug, Clone)]
pub struct MemoryTerrain {
    size: TerrainSize,
    heights: HeightGrid,
    alphamap: SplatWeightGrid,
}

impl MemoryTerrain {
    /// Creates a flat terrain with a square heightmap and alphamap.
    pub fn new(resolution: usize, alphamap_resolution: usize) -> Self {
        Self {
            size: TerrainSize::default(),
            heights: HeightGrid::square(resolution),
            alphamap: SplatWeightGrid::new(alphamap_resolution, alphamap_resolution, SPLAT_LAYERS),
        }
    }

    /// Sets the world-space size.
    pub fn with_size(mut self, size: TerrainSize) -> Self {
        self.size = size;
        self
    }

    /// Replaces the alphamap with a zeroed one of the given shape.
    pub fn with_alphamap(mut self, width: usize, height: usize, layers: usize) -> Self {
        self.alphamap = SplatWeightGrid::new(width, height, layers);
        self
    }

    /// Replaces the stored heights. The grid must be square.
    pub fn with_heights(mut self, heights: HeightGrid) -> Result<Self, ConfigError> {
        if !heights.is_square() {
            return Err(ConfigError::NonSquareHeightmap {
                width: heights.width(),
                height: heights.height(),
            });
        }
        self.heights = heights;
        Ok(self)
    }

    pub fn size(&self) -> TerrainSize {
        self.size
    }

    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    pub fn alphamap(&self) -> &SplatWeightGrid {
        &self.alphamap
    }

    /// Bilinearly interpolated world height at fractional grid coordinates,
    /// clamped to the grid.
    fn interpolated_height(&self, gx: f64, gy: f64) -> f64 {
        let last = (self.heights.resolution() - 1) as f64;
        let gx = gx.clamp(0.0, last);
        let gy = gy.clamp(0.0, last);

        let x0 = gx.floor() as usize;
        let y0 = gy.floor() as usize;
        let x1 = (x0 + 1).min(last as usize);
        let y1 = (y0 + 1).min(last as usize);
        let tx = gx - x0 as f64;
        let ty = gy - y0 as f64;

        let top = self.heights.get(x0, y0) * (1.0 - tx) + self.heights.get(x1, y0) * tx;
        let bottom = self.heights.get(x0, y1) * (1.0 - tx) + self.heights.get(x1, y1) * tx;
        (top * (1.0 - ty) + bottom * ty) * self.size.height
    }
}

impl TerrainSampler for MemoryTerrain {
    fn height_resolution(&self) -> usize {
        self.heights.resolution()
    }

    fn height_dimensions(&self) -> (usize, usize) {
        (self.heights.width(), self.heights.height())
    }

    fn sample_height_at(&self, ix: usize, iy: usize) -> f64 {
        let resolution = self.heights.resolution();
        if resolution == 0 {
            return 0.0;
        }
        let x = ix.min(resolution - 1);
        let y = iy.min(resolution - 1);
        self.heights.get(x, y) * self.size.height
    }

    fn sample_slope_degrees_at(&self, nx: f64, ny: f64) -> f64 {
        let resolution = self.heights.resolution();
        if resolution < 2 {
            return 0.0;
        }

        let cells = (resolution - 1) as f64;
        let gx = nx.clamp(0.0, 1.0) * cells;
        let gy = ny.clamp(0.0, 1.0) * cells;
        let cell_x = self.size.width / cells;
        let cell_y = self.size.length / cells;

        // Central differences one cell apart.
        let dx = (self.interpolated_height(gx + 1.0, gy) - self.interpolated_height(gx - 1.0, gy))
            / (2.0 * cell_x);
        let dy = (self.interpolated_height(gx, gy + 1.0) - self.interpolated_height(gx, gy - 1.0))
            / (2.0 * cell_y);

        dx.hypot(dy).atan().to_degrees()
    }
}

impl TerrainSink for MemoryTerrain {
    fn get_height_region(
        &self,
        x0: i64,
        y0: i64,
        width: usize,
        height: usize,
    ) -> Result<HeightGrid, RegionError> {
        self.heights.region(x0, y0, width, height)
    }

    fn set_height_region(
        &mut self,
        x0: i64,
        y0: i64,
        heights: &HeightGrid,
    ) -> Result<(), RegionError> {
        self.heights.write_region(x0, y0, heights)
    }

    fn alphamap_dimensions(&self) -> AlphamapDimensions {
        AlphamapDimensions {
            width: self.alphamap.width(),
            height: self.alphamap.height(),
            layers: self.alphamap.layers(),
        }
    }

    fn set_alpha_weights(
        &mut self,
        x0: usize,
        y0: usize,
        weights: &SplatWeightGrid,
    ) -> Result<(), RegionError> {
        self.alphamap.write_region(x0, y0, weights)
    }
}
