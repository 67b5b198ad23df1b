//! Gradient noise sampling.

use noise::{NoiseFn, OpenSimplex, Perlin, Value};

use crate::config::NoiseKind;

/// A deterministic, continuous 2D noise function.
///
/// Implementations must return a value in `[0, 1]` for any finite input and
/// must not depend on hidden mutable state: equal inputs give equal outputs.
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<T: NoiseSource + ?Sized> NoiseSource for &T {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Perlin(Perlin),
    Value(Value),
    OpenSimplex(OpenSimplex),
}

/// Noise source backed by the `noise` crate.
///
/// Raw output in `[-1, 1]` is remapped to `[0, 1]`. With Perlin noise every
/// integer lattice point samples to exactly `0.5`.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    kind: NoiseKind,
    backend: Backend,
}

impl GradientNoise {
    /// Creates a source of the given family with a fixed permutation seed.
    pub fn new(kind: NoiseKind, seed: u32) -> Self {
        let backend = match kind {
            NoiseKind::Perlin => Backend::Perlin(Perlin::new(seed)),
            NoiseKind::Value => Backend::Value(Value::new(seed)),
            NoiseKind::OpenSimplex => Backend::OpenSimplex(OpenSimplex::new(seed)),
        };
        Self { kind, backend }
    }

    /// Perlin noise with permutation seed 0.
    pub fn perlin() -> Self {
        Self::new(NoiseKind::Perlin, 0)
    }

    pub fn kind(&self) -> NoiseKind {
        self.kind
    }
}

impl Default for GradientNoise {
    fn default() -> Self {
        Self::perlin()
    }
}

impl NoiseSource for GradientNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = match &self.backend {
            Backend::Perlin(n) => n.get([x, y]),
            Backend::Value(n) => n.get([x, y]),
            Backend::OpenSimplex(n) => n.get([x, y]),
        };
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [NoiseKind; 3] = [NoiseKind::Perlin, NoiseKind::Value, NoiseKind::OpenSimplex];

    #[test]
    fn test_sample_consistency() {
        for kind in KINDS {
            let a = GradientNoise::new(kind, 7);
            let b = GradientNoise::new(kind, 7);
            for &(x, y) in &[(0.3, 0.7), (12.25, -4.5), (1000.1, 3.3)] {
                assert_eq!(a.sample(x, y), b.sample(x, y));
                assert_eq!(a.sample(x, y), a.sample(x, y));
            }
        }
    }

    #[test]
    fn test_kind_selects_backend() {
        for kind in KINDS {
            assert_eq!(GradientNoise::new(kind, 1).kind(), kind);
        }
        assert_eq!(GradientNoise::default().kind(), NoiseKind::Perlin);

        // Different families disagree away from the lattice.
        let perlin = GradientNoise::new(NoiseKind::Perlin, 1).sample(0.37, 0.61);
        let value = GradientNoise::new(NoiseKind::Value, 1).sample(0.37, 0.61);
        assert_ne!(perlin, value);
    }

    #[test]
    fn test_sample_range() {
        for kind in KINDS {
            let source = GradientNoise::new(kind, 3);
            for i in 0..500 {
                let x = i as f64 * 0.173 - 40.0;
                let y = i as f64 * 0.291 + 11.0;
                let v = source.sample(x, y);
                assert!((0.0..=1.0).contains(&v), "{kind:?} sample {v} out of range");
            }
        }
    }

    #[test]
    fn test_perlin_lattice_is_midpoint() {
        let source = GradientNoise::perlin();
        assert_eq!(source.sample(0.0, 0.0), 0.5);
        assert_eq!(source.sample(3.0, -2.0), 0.5);
    }

    #[test]
    fn test_sample_is_smooth() {
        let source = GradientNoise::perlin();
        let mut max_step: f64 = 0.0;
        for i in 0..1000 {
            let x = 0.37 + i as f64 * 0.001;
            let step = (source.sample(x + 0.001, 1.61) - source.sample(x, 1.61)).abs();
            max_step = max_step.max(step);
        }
        assert!(max_step < 0.01, "adjacent samples jumped by {max_step}");
    }

    #[test]
    fn test_sample_varies() {
        let source = GradientNoise::perlin();
        let first = source.sample(0.5, 0.5);
        assert!((1..50).any(|i| source.sample(0.5 + i as f64 * 0.37, 0.5) != first));
    }
}
