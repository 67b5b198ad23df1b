//! Object scatter planning on the finished terrain.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::config::ScatterConfig;
use crate::generators::peaks::{Peak, PeakSet};
use crate::sink::TerrainSampler;

/// A planned object position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Heightmap column.
    pub x: usize,
    /// Heightmap row.
    pub y: usize,
    /// World-space height of the ground, including the terrain origin.
    pub height: f64,
    /// Which object variant to spawn.
    pub variant: usize,
}

/// Plans object positions on a regular grid, keeping clear of mountains.
///
/// Candidates sit every `stride` cells in row-major order. A candidate is
/// kept once if it is more than `exclusion_radius` from every peak. Variants
/// come from an RNG seeded by the run seed, so a plan is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct ScatterPlanner {
    stride: usize,
    variant_count: usize,
    origin_height: f64,
    exclusion_radius: f64,
}

impl ScatterPlanner {
    pub fn new(config: &ScatterConfig, exclusion_radius: f64) -> Self {
        Self {
            stride: config.stride.max(1),
            variant_count: config.variant_count.max(1),
            origin_height: config.origin_height,
            exclusion_radius,
        }
    }

    /// Plans placements over the sampler's heightmap.
    pub fn plan<S: TerrainSampler + ?Sized>(
        &self,
        sampler: &S,
        peaks: &PeakSet,
        seed: f64,
    ) -> Vec<Placement> {
        let resolution = sampler.height_resolution();
        let mut rng = StdRng::seed_from_u64(seed.to_bits());
        let mut placements = Vec::new();

        for y in (0..resolution).step_by(self.stride) {
            for x in (0..resolution).step_by(self.stride) {
                if !peaks.is_clear_of(&Peak::new(x, y), self.exclusion_radius) {
                    continue;
                }
                placements.push(Placement {
                    x,
                    y,
                    height: sampler.sample_height_at(x, y) + self.origin_height,
                    variant: rng.gen_range(0..self.variant_count),
                });
            }
        }

        info!(count = placements.len(), "Scatter planned");
        placements
    }
}
