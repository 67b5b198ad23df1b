//! Noise primitives shared by the height generators.
//!
//! - [`NoiseSource`]: a deterministic 2D noise function in `[0, 1]`
//! - [`GradientNoise`]: the `noise`-crate backed implementation
//! - [`OctaveNoise`]: octave summation over any source

mod noise_source;
mod octaves;

pub use noise_source::{GradientNoise, NoiseSource};
pub use octaves::OctaveNoise;
