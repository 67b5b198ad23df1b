//! Base height field synthesis.

use tracing::debug;

use crate::config::NoiseParams;
use crate::errors::ConfigError;
use crate::grid::HeightGrid;
use crate::terrain::{NoiseSource, OctaveNoise};

/// Fills a square grid with a constant floor plus octave-summed noise.
#[derive(Debug, Clone)]
pub struct BaseHeightGenerator<N> {
    noise: N,
    params: NoiseParams,
    base_height: f64,
}

impl<N: NoiseSource> BaseHeightGenerator<N> {
    /// Creates a generator with the reference base tuning and a 0.05 floor.
    pub fn new(noise: N) -> Self {
        Self {
            noise,
            params: NoiseParams::base_terrain(),
            base_height: 0.05,
        }
    }

    /// Sets the noise schedule.
    pub fn with_params(mut self, params: NoiseParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the constant floor added to every cell.
    pub fn with_base_height(mut self, height: f64) -> Self {
        self.base_height = height;
        self
    }

    /// Height of a single cell.
    ///
    /// `base_height + Σ sample((x+seed)/R * f_i, (y+seed)/R * f_i) * a_i`
    pub fn height_at(&self, x: usize, y: usize, resolution: usize, seed: f64) -> f64 {
        let octaves = OctaveNoise::new(&self.noise, self.params);
        self.base_height + octaves.sum(x as f64, y as f64, seed, resolution as f64)
    }

    /// Generates a `resolution x resolution` grid.
    pub fn generate(&self, resolution: usize, seed: f64) -> Result<HeightGrid, ConfigError> {
        if resolution == 0 {
            return Err(ConfigError::InvalidResolution(resolution));
        }

        let octaves = OctaveNoise::new(&self.noise, self.params);
        let scale = resolution as f64;
        let mut grid = HeightGrid::square(resolution);

        for y in 0..resolution {
            for x in 0..resolution {
                let height = self.base_height + octaves.sum(x as f64, y as f64, seed, scale);
                grid.set(x, y, height);
            }
        }

        debug!(resolution, seed, octaves = self.params.octaves, "Base heights generated");
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::GradientNoise;

    #[test]
    fn test_origin_matches_reference_sum() {
        let noise = GradientNoise::perlin();
        let base_gen = BaseHeightGenerator::new(&noise);
        let grid = base_gen.generate(33, 0.0).unwrap();

        // Seed 0 puts (0, 0) on the lattice for every octave.
        let mut octave_sum = 0.0;
        let mut frequency = 4.0;
        let mut amplitude = 0.01;
        for _ in 0..8 {
            octave_sum += noise.sample(0.0 * frequency, 0.0 * frequency) * amplitude;
            frequency *= 1.5;
            amplitude *= 0.5;
        }
        assert_eq!(grid.get(0, 0), 0.05 + octave_sum);
    }

    #[test]
    fn test_generation_consistency() {
        let base_gen = BaseHeightGenerator::new(GradientNoise::perlin());
        let a = base_gen.generate(24, 17.0).unwrap();
        let b = base_gen.generate(24, 17.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_heights() {
        let base_gen = BaseHeightGenerator::new(GradientNoise::perlin());
        let a = base_gen.generate(24, 0.0).unwrap();
        let b = base_gen.generate(24, 10.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_height_range() {
        let noise = GradientNoise::perlin();
        let base_gen = BaseHeightGenerator::new(&noise);
        let max_noise = OctaveNoise::new(&noise, NoiseParams::base_terrain()).max_amplitude();
        let grid = base_gen.generate(40, 3.0).unwrap();

        for (_, _, h) in grid.cells() {
            assert!(h.is_finite());
            assert!(h >= 0.05 && h <= 0.05 + max_noise + 1e-12);
        }
    }

    #[test]
    fn test_height_at_agrees_with_grid() {
        let base_gen = BaseHeightGenerator::new(GradientNoise::perlin()).with_base_height(0.1);
        let grid = base_gen.generate(20, 4.5).unwrap();
        assert_eq!(grid.get(13, 7), base_gen.height_at(13, 7, 20, 4.5));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let base_gen = BaseHeightGenerator::new(GradientNoise::perlin());
        assert!(matches!(
            base_gen.generate(0, 0.0),
            Err(ConfigError::InvalidResolution(0))
        ));
    }
}
