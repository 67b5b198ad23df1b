//! Error types for terrain generation.

use thiserror::Error;

use crate::generators::peaks::Peak;

/// Invalid configuration, reported before any generation work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Heightmap resolution must be positive, got {0}")]
    InvalidResolution(usize),

    #[error("Mountain resolution must be positive")]
    ZeroMountainResolution,

    #[error("Alphamap must have exactly {expected} layers, sink has {actual}")]
    LayerMismatch { expected: usize, actual: usize },

    #[error("Heightmap must be square, got {width}x{height}")]
    NonSquareHeightmap { width: usize, height: usize },

    #[error("Alphamap dimensions must be positive, got {width}x{height}")]
    InvalidAlphamap { width: usize, height: usize },

    #[error("Seed must be finite, got {0}")]
    InvalidSeed(f64),

    #[error("Parameter `{name}` is out of range: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Scatter stride must be positive")]
    ZeroScatterStride,

    #[error("Scatter needs at least one variant")]
    ZeroScatterVariants,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A rectangular read or write that does not fit the target grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    #[error(
        "Region {width}x{height} at ({x0}, {y0}) exceeds grid of {grid_width}x{grid_height}"
    )]
    OutOfBounds {
        x0: i64,
        y0: i64,
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
    },

    #[error("Weight grid has {actual} layers, expected {expected}")]
    LayerMismatch { expected: usize, actual: usize },
}

/// The peak selector ran out of eligible cells.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeakSelectionError {
    #[error(
        "No eligible peak for pick {} of {requested}: every cell is excluded",
        .found.len() + 1
    )]
    DegenerateSelection { requested: usize, found: Vec<Peak> },
}

/// Failure of a whole generation run.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Peak selection error: {0}")]
    PeakSelection(#[from] PeakSelectionError),

    #[error("Sink error: {0}")]
    Sink(#[from] RegionError),
}
