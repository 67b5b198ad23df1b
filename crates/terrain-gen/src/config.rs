//! Configuration types for terrain generation.
//!
//! Every struct implements [`Default`] with the reference tuning. Sections are
//! `#[serde(default)]`, so a JSON file only needs the sections it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Seed step of [`TerrainPipeline::increase_seed`] and [`TerrainPipeline::decrease_seed`].
///
/// [`TerrainPipeline::increase_seed`]: crate::pipeline::TerrainPipeline::increase_seed
/// [`TerrainPipeline::decrease_seed`]: crate::pipeline::TerrainPipeline::decrease_seed
pub const SEED_STEP: f64 = 10.0;

/// Number of alphamap layers: base, slope/rock, height/snow.
pub const SPLAT_LAYERS: usize = 3;

/// Gradient noise family backing the [`NoiseSource`](crate::terrain::NoiseSource).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    #[default]
    Perlin,
    Value,
    OpenSimplex,
}

/// Frequency/amplitude schedule for one octave-summed noise field.
///
/// Noise tables are read whole; a JSON config either omits one or gives every field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Amplitude of the first octave.
    pub amplitude: f64,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Frequency factor between consecutive octaves.
    pub frequency_multiplier: f64,
    /// Amplitude factor between consecutive octaves.
    pub amplitude_multiplier: f64,
}

impl NoiseParams {
    /// Rolling low-amplitude field used for the whole heightmap.
    pub fn base_terrain() -> Self {
        Self {
            frequency: 4.0,
            amplitude: 0.01,
            octaves: 8,
            frequency_multiplier: 1.5,
            amplitude_multiplier: 0.5,
        }
    }

    /// High-amplitude field carved around each peak.
    pub fn mountains() -> Self {
        Self {
            frequency: 0.5,
            amplitude: 0.5,
            octaves: 16,
            frequency_multiplier: 1.3,
            amplitude_multiplier: 0.3,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("frequency", self.frequency),
            ("amplitude", self.amplitude),
            ("frequency_multiplier", self.frequency_multiplier),
            ("amplitude_multiplier", self.amplitude_multiplier),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Peak selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakConfig {
    /// Number of peaks to select.
    pub count: usize,
    /// Continue with fewer peaks instead of failing when the grid runs out of
    /// eligible cells.
    pub allow_partial: bool,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            count: 3,
            allow_partial: false,
        }
    }
}

/// Splat-map derivation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatConfig {
    pub enabled: bool,
    /// Constant weight of the base layer before normalization.
    pub base_weight: f64,
    /// Slope in degrees at which the rock layer switches to the steep formula.
    pub steep_threshold_degrees: f64,
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_weight: 0.2,
            steep_threshold_degrees: 45.0,
        }
    }
}

/// Object scatter planning settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub enabled: bool,
    /// Distance in heightmap cells between candidate positions.
    pub stride: usize,
    /// Number of distinct object variants to choose from.
    pub variant_count: usize,
    /// World-space height of the terrain origin, added to sampled heights.
    pub origin_height: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stride: 50,
            variant_count: 1,
            origin_height: 0.0,
        }
    }
}

/// Full terrain generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Noise family used by both fields.
    pub noise_kind: NoiseKind,
    /// Permutation table seed of the noise source. Terrain variation comes
    /// from the run seed, which offsets sample coordinates.
    pub noise_seed: u32,

    /// Constant floor added to every cell.
    pub base_terrain_height: f64,
    pub base: NoiseParams,

    /// Side length of each mountain window, also the minimum peak separation.
    pub mountain_resolution: usize,
    pub mountains: NoiseParams,

    pub peaks: PeakConfig,
    pub splat: SplatConfig,
    pub scatter: ScatterConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise_kind: NoiseKind::default(),
            noise_seed: 0,
            base_terrain_height: 0.05,
            base: NoiseParams::base_terrain(),
            mountain_resolution: 100,
            mountains: NoiseParams::mountains(),
            peaks: PeakConfig::default(),
            splat: SplatConfig::default(),
            scatter: ScatterConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Sets the mountain window size / peak separation.
    pub fn with_mountain_resolution(mut self, resolution: usize) -> Self {
        self.mountain_resolution = resolution;
        self
    }

    /// Sets the number of peaks.
    pub fn with_peak_count(mut self, count: usize) -> Self {
        self.peaks.count = count;
        self
    }

    /// Enables or disables the splat pass.
    pub fn with_splat(mut self, enabled: bool) -> Self {
        self.splat.enabled = enabled;
        self
    }

    /// Enables scatter planning with the given number of variants.
    pub fn with_scatter(mut self, variant_count: usize) -> Self {
        self.scatter.enabled = true;
        self.scatter.variant_count = variant_count;
        self
    }

    /// Checks everything that does not depend on the sink.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mountain_resolution == 0 {
            return Err(ConfigError::ZeroMountainResolution);
        }
        if !self.base_terrain_height.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "base_terrain_height",
                value: self.base_terrain_height,
            });
        }
        self.base.validate()?;
        self.mountains.validate()?;

        if self.splat.enabled {
            // A zero base weight lets a flat, sea-level cell normalize by zero.
            let base_weight = self.splat.base_weight;
            if !base_weight.is_finite() || base_weight <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "splat.base_weight",
                    value: base_weight,
                });
            }
            let threshold = self.splat.steep_threshold_degrees;
            if !threshold.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name: "splat.steep_threshold_degrees",
                    value: threshold,
                });
            }
        }

        if self.scatter.enabled {
            if self.scatter.stride == 0 {
                return Err(ConfigError::ZeroScatterStride);
            }
            if self.scatter.variant_count == 0 {
                return Err(ConfigError::ZeroScatterVariants);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_tuning() {
        let config = TerrainConfig::default();
        assert_eq!(config.base_terrain_height, 0.05);
        assert_eq!(config.base.octaves, 8);
        assert_eq!(config.mountains.octaves, 16);
        assert_eq!(config.mountain_resolution, 100);
        assert_eq!(config.peaks.count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TerrainConfig::from_json_str(
            r#"{ "mountain_resolution": 64, "peaks": { "count": 5 }, "noise_kind": "open_simplex" }"#,
        )
        .unwrap();

        assert_eq!(config.mountain_resolution, 64);
        assert_eq!(config.peaks.count, 5);
        assert!(!config.peaks.allow_partial);
        assert_eq!(config.noise_kind, NoiseKind::OpenSimplex);
        assert_eq!(config.base, NoiseParams::base_terrain());
        assert_eq!(config.mountains, NoiseParams::mountains());
    }

    #[test]
    fn test_incomplete_noise_table_is_rejected() {
        let result = TerrainConfig::from_json_str(r#"{ "mountains": { "octaves": 4 } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_zero_mountain_resolution() {
        let config = TerrainConfig::default().with_mountain_resolution(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroMountainResolution)
        ));
    }

    #[test]
    fn test_rejects_non_finite_noise() {
        let mut config = TerrainConfig::default();
        config.mountains.amplitude = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "amplitude", .. })
        ));
    }

    #[test]
    fn test_scatter_validation_only_when_enabled() {
        let mut config = TerrainConfig::default();
        config.scatter.variant_count = 0;
        assert!(config.validate().is_ok());

        config.scatter.enabled = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroScatterVariants)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TerrainConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
