//! In-memory grids exchanged between the generators and the sink.

use serde::{Deserialize, Serialize};

use crate::errors::RegionError;

/// Row-major 2D array of elevations, indexed `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl HeightGrid {
    /// Creates a zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Creates a square zero-filled grid of side `resolution`.
    pub fn square(resolution: usize) -> Self {
        Self::new(resolution, resolution)
    }

    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Side length of a square grid.
    pub fn resolution(&self) -> usize {
        self.width
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    pub fn add(&mut self, x: usize, y: usize, delta: f64) {
        let i = self.index(x, y);
        self.data[i] += delta;
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Iterates `(x, y, value)` in row-major order (y outer, x inner).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % width, i / width, v))
    }

    /// Returns `(min, max)` over all cells, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    fn check_region(
        &self,
        x0: i64,
        y0: i64,
        width: usize,
        height: usize,
    ) -> Result<(usize, usize), RegionError> {
        let fits = x0 >= 0
            && y0 >= 0
            && (x0 as usize).saturating_add(width) <= self.width
            && (y0 as usize).saturating_add(height) <= self.height;

        if fits {
            Ok((x0 as usize, y0 as usize))
        } else {
            Err(RegionError::OutOfBounds {
                x0,
                y0,
                width,
                height,
                grid_width: self.width,
                grid_height: self.height,
            })
        }
    }

    /// Copies out the `width x height` sub-rectangle whose top-left corner is `(x0, y0)`.
    pub fn region(
        &self,
        x0: i64,
        y0: i64,
        width: usize,
        height: usize,
    ) -> Result<HeightGrid, RegionError> {
        let (ox, oy) = self.check_region(x0, y0, width, height)?;

        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let start = self.index(ox, oy + y);
            data.extend_from_slice(&self.data[start..start + width]);
        }

        Ok(HeightGrid {
            width,
            height,
            data,
        })
    }

    /// Writes `patch` back with its top-left corner at `(x0, y0)`.
    pub fn write_region(
        &mut self,
        x0: i64,
        y0: i64,
        patch: &HeightGrid,
    ) -> Result<(), RegionError> {
        let (ox, oy) = self.check_region(x0, y0, patch.width, patch.height)?;

        for y in 0..patch.height {
            let dst = self.index(ox, oy + y);
            let src = y * patch.width;
            self.data[dst..dst + patch.width].copy_from_slice(&patch.data[src..src + patch.width]);
        }

        Ok(())
    }
}

/// Per-cell texture blend weights, indexed `(x, y, layer)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplatWeightGrid {
    width: usize,
    height: usize,
    layers: usize,
    data: Vec<f64>,
}

impl SplatWeightGrid {
    pub fn new(width: usize, height: usize, layers: usize) -> Self {
        Self {
            width,
            height,
            layers,
            data: vec![0.0; width * height * layers],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) * self.layers
    }

    /// All layer weights of one cell.
    pub fn cell(&self, x: usize, y: usize) -> &[f64] {
        let o = self.offset(x, y);
        &self.data[o..o + self.layers]
    }

    pub fn set_cell(&mut self, x: usize, y: usize, weights: &[f64]) {
        debug_assert_eq!(weights.len(), self.layers);
        let o = self.offset(x, y);
        self.data[o..o + self.layers].copy_from_slice(weights);
    }

    pub fn get(&self, x: usize, y: usize, layer: usize) -> f64 {
        self.cell(x, y)[layer]
    }

    /// Copies `patch` in with its top-left corner at `(x0, y0)`.
    pub fn write_region(
        &mut self,
        x0: usize,
        y0: usize,
        patch: &SplatWeightGrid,
    ) -> Result<(), RegionError> {
        if patch.layers != self.layers {
            return Err(RegionError::LayerMismatch {
                expected: self.layers,
                actual: patch.layers,
            });
        }
        if x0 + patch.width > self.width || y0 + patch.height > self.height {
            return Err(RegionError::OutOfBounds {
                x0: x0 as i64,
                y0: y0 as i64,
                width: patch.width,
                height: patch.height,
                grid_width: self.width,
                grid_height: self.height,
            });
        }

        for y in 0..patch.height {
            let dst = self.offset(x0, y0 + y);
            let src = patch.offset(0, y);
            let len = patch.width * patch.layers;
            self.data[dst..dst + len].copy_from_slice(&patch.data[src..src + len]);
        }

        Ok(())
    }
}
