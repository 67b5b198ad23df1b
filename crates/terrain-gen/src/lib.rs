//! Seeded terrain generation.
//!
//! This crate synthesizes a square heightmap from layered noise, picks
//! well-separated peaks, blends mountain noise around them, and derives a
//! three-layer splat map from height and slope. Results are written to any
//! [`TerrainSink`](sink::TerrainSink).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use terrain_gen::prelude::*;
//!
//! let mut terrain = MemoryTerrain::new(513, 512);
//! let report = generate(&mut terrain, 0.0, &TerrainConfig::default())?;
//! println!("peaks: {:?}", report.peaks);
//! ```

pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod pipeline;
pub mod sink;
pub mod terrain;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{
        NoiseKind, NoiseParams, PeakConfig, SEED_STEP, ScatterConfig, SplatConfig, TerrainConfig,
    };
    pub use crate::errors::{ConfigError, GenerationError, PeakSelectionError, RegionError};
    pub use crate::generators::{
        BaseHeightGenerator, MountainBlender, Peak, PeakSelector, PeakSet, Placement,
        ScatterPlanner, SplatDeriver, WeightAnomaly,
    };
    pub use crate::grid::{HeightGrid, SplatWeightGrid};
    pub use crate::pipeline::{GenerationReport, TerrainPipeline, generate};
    pub use crate::sink::{
        AlphamapDimensions, MemoryTerrain, TerrainSampler, TerrainSink, TerrainSize,
    };
    pub use crate::terrain::{GradientNoise, NoiseSource, OctaveNoise};
}
