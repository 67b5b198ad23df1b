//! Texture weight (splat map) derivation from height and slope.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{SPLAT_LAYERS, SplatConfig};
use crate::errors::{ConfigError, GenerationError};
use crate::grid::SplatWeightGrid;
use crate::sink::{AlphamapDimensions, TerrainSampler, TerrainSink};

/// Flat ground texture.
pub const LAYER_BASE: usize = 0;
/// Slope/rock texture.
pub const LAYER_SLOPE: usize = 1;
/// Height/snow texture.
pub const LAYER_HEIGHT: usize = 2;

/// What was wrong with a cell's raw weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Steep slope produced a negative rock weight; clamped to 0.
    NegativeSlopeWeight(f64),
    /// Terrain below zero produced a negative height weight; clamped to 0.
    NegativeHeight(f64),
    /// Height component above 1: the heightmap and world height scale disagree.
    HeightAboveOne(f64),
}

/// A flagged alphamap cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightAnomaly {
    pub x: usize,
    pub y: usize,
    pub kind: AnomalyKind,
}

/// Anomaly totals by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalySummary {
    pub negative_slope_weight: usize,
    pub negative_height: usize,
    pub height_above_one: usize,
}

impl AnomalySummary {
    pub fn from_anomalies(anomalies: &[WeightAnomaly]) -> Self {
        let mut summary = Self::default();
        for anomaly in anomalies {
            match anomaly.kind {
                AnomalyKind::NegativeSlopeWeight(_) => summary.negative_slope_weight += 1,
                AnomalyKind::NegativeHeight(_) => summary.negative_height += 1,
                AnomalyKind::HeightAboveOne(_) => summary.height_above_one += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.negative_slope_weight + self.negative_height + self.height_above_one
    }
}

/// Output of a splat pass.
#[derive(Debug, Clone)]
pub struct SplatResult {
    pub weights: SplatWeightGrid,
    pub anomalies: Vec<WeightAnomaly>,
}

/// Derives normalized base/slope/height weights for every alphamap cell.
#[derive(Debug, Clone, Copy)]
pub struct SplatDeriver {
    base_weight: f64,
    steep_threshold_degrees: f64,
}

impl Default for SplatDeriver {
    fn default() -> Self {
        Self::from_config(&SplatConfig::default())
    }
}

impl SplatDeriver {
    pub fn from_config(config: &SplatConfig) -> Self {
        Self {
            base_weight: config.base_weight,
            steep_threshold_degrees: config.steep_threshold_degrees,
        }
    }

    /// Normalized weights for one cell.
    ///
    /// `height` is the height component (world height over heightmap
    /// resolution) and `slope_degrees` the steepness. Clamped or suspicious
    /// inputs are reported through `on_anomaly`.
    pub fn weights(
        &self,
        height: f64,
        slope_degrees: f64,
        mut on_anomaly: impl FnMut(AnomalyKind),
    ) -> [f64; SPLAT_LAYERS] {
        let mut slope_weight = if slope_degrees < self.steep_threshold_degrees {
            1.0 - slope_degrees / 90.0
        } else {
            0.5 - slope_degrees / 90.0
        };
        if slope_weight < 0.0 {
            on_anomaly(AnomalyKind::NegativeSlopeWeight(slope_weight));
            slope_weight = 0.0;
        }

        let mut height_weight = height;
        if height_weight > 1.0 {
            on_anomaly(AnomalyKind::HeightAboveOne(height_weight));
        } else if height_weight < 0.0 {
            on_anomaly(AnomalyKind::NegativeHeight(height_weight));
            height_weight = 0.0;
        }

        let mut weights = [0.0; SPLAT_LAYERS];
        weights[LAYER_BASE] = self.base_weight;
        weights[LAYER_SLOPE] = slope_weight;
        weights[LAYER_HEIGHT] = height_weight;

        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        weights
    }

    /// Computes the weight grid for an alphamap of the given shape.
    pub fn derive<S: TerrainSampler + ?Sized>(
        &self,
        sampler: &S,
        dims: AlphamapDimensions,
    ) -> Result<SplatResult, ConfigError> {
        if dims.layers != SPLAT_LAYERS {
            return Err(ConfigError::LayerMismatch {
                expected: SPLAT_LAYERS,
                actual: dims.layers,
            });
        }
        if dims.width == 0 || dims.height == 0 {
            return Err(ConfigError::InvalidAlphamap {
                width: dims.width,
                height: dims.height,
            });
        }
        let (grid_width, grid_height) = sampler.height_dimensions();
        if grid_width != grid_height {
            return Err(ConfigError::NonSquareHeightmap {
                width: grid_width,
                height: grid_height,
            });
        }

        let resolution = sampler.height_resolution() as f64;
        let mut weights = SplatWeightGrid::new(dims.width, dims.height, dims.layers);
        let mut anomalies = Vec::new();

        for y in 0..dims.height {
            for x in 0..dims.width {
                let nx = x as f64 / dims.width as f64;
                let ny = y as f64 / dims.height as f64;

                let ix = (nx * resolution).round_ties_even() as usize;
                let iy = (ny * resolution).round_ties_even() as usize;
                let height = sampler.sample_height_at(ix, iy) / resolution;
                let slope = sampler.sample_slope_degrees_at(nx, ny);

                let cell = self.weights(height, slope, |kind| {
                    debug!(x, y, ?kind, "Splat weight anomaly");
                    anomalies.push(WeightAnomaly { x, y, kind });
                });
                weights.set_cell(x, y, &cell);
            }
        }

        Ok(SplatResult { weights, anomalies })
    }

    /// Derives weights from `sink` and writes them back in one bulk call.
    pub fn paint<S: TerrainSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<SplatResult, GenerationError> {
        let dims = sink.alphamap_dimensions();
        let result = self.derive(&*sink, dims)?;
        sink.set_alpha_weights(0, 0, &result.weights)?;

        let summary = AnomalySummary::from_anomalies(&result.anomalies);
        if summary.total() > 0 {
            warn!(
                negative_slope_weight = summary.negative_slope_weight,
                negative_height = summary.negative_height,
                height_above_one = summary.height_above_one,
                "Splat weights clamped or flagged"
            );
        }
        info!(width = dims.width, height = dims.height, "Splat map painted");

        Ok(result)
    }
}
