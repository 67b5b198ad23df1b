//! Octave summation (fractal noise).

use crate::config::NoiseParams;

use super::NoiseSource;

/// Sums several octaves of a [`NoiseSource`].
///
/// Octave `i` samples at frequency `f_i` with weight `a_i`, where
/// `f_{i+1} = f_i * frequency_multiplier` and `a_{i+1} = a_i * amplitude_multiplier`.
/// Unlike normalized fBm the result is not rescaled; callers pick amplitudes
/// in the units they want.
#[derive(Debug, Clone, Copy)]
pub struct OctaveNoise<'a, N: ?Sized> {
    source: &'a N,
    params: NoiseParams,
}

impl<'a, N: NoiseSource + ?Sized> OctaveNoise<'a, N> {
    pub fn new(source: &'a N, params: NoiseParams) -> Self {
        Self { source, params }
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Octave sum at grid coordinate `(x, y)`.
    ///
    /// The coordinate is offset by `seed` and divided by `scale` (the grid or
    /// window side length) before the per-octave frequency is applied.
    pub fn sum(&self, x: f64, y: f64, seed: f64, scale: f64) -> f64 {
        let u = (x + seed) / scale;
        let v = (y + seed) / scale;

        let mut total = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..self.params.octaves {
            total += self.source.sample(u * frequency, v * frequency) * amplitude;
            frequency *= self.params.frequency_multiplier;
            amplitude *= self.params.amplitude_multiplier;
        }

        total
    }

    /// Largest value [`sum`](Self::sum) can reach: the sum of all octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        let mut total = 0.0;
        let mut amplitude = self.params.amplitude;
        for _ in 0..self.params.octaves {
            total += amplitude;
            amplitude *= self.params.amplitude_multiplier;
        }
        total
    }
}
