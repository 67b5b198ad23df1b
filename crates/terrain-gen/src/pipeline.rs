//! The generation pipeline: base heights, peaks, mountains, then the
//! optional splat and scatter passes.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{SEED_STEP, SPLAT_LAYERS, TerrainConfig};
use crate::errors::{ConfigError, GenerationError, PeakSelectionError};
use crate::generators::{
    AnomalySummary, BaseHeightGenerator, MountainBlender, PeakSelector, PeakSet, Placement,
    ScatterPlanner, SkippedPeak, SplatDeriver,
};
use crate::grid::HeightGrid;
use crate::sink::TerrainSink;
use crate::terrain::GradientNoise;

/// Wall-clock time per phase, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GenerationMetrics {
    pub base_ms: u64,
    pub peaks_ms: u64,
    pub mountains_ms: u64,
    pub splat_ms: u64,
    pub scatter_ms: u64,
    pub total_ms: u64,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub seed: f64,
    pub resolution: usize,
    /// Peaks in selection order.
    pub peaks: PeakSet,
    /// Peaks whose mountain window did not fit the grid.
    pub skipped_peaks: Vec<SkippedPeak>,
    /// `(min, max)` normalized height after blending.
    pub height_range: Option<(f64, f64)>,
    /// Splat anomaly totals; `None` when the splat pass is disabled.
    pub splat_anomalies: Option<AnomalySummary>,
    /// Planned placements; empty when scatter planning is disabled.
    pub placements: Vec<Placement>,
    pub metrics: GenerationMetrics,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn validate<S: TerrainSink + ?Sized>(
    sink: &S,
    seed: f64,
    config: &TerrainConfig,
) -> Result<usize, ConfigError> {
    config.validate()?;

    if !seed.is_finite() {
        return Err(ConfigError::InvalidSeed(seed));
    }

    let resolution = sink.height_resolution();
    if resolution == 0 {
        return Err(ConfigError::InvalidResolution(resolution));
    }
    let (width, height) = sink.height_dimensions();
    if width != height || width != resolution {
        return Err(ConfigError::NonSquareHeightmap { width, height });
    }

    if config.splat.enabled {
        let dims = sink.alphamap_dimensions();
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
    }

    Ok(resolution)
}

/// Runs every pass and returns the committed grid with the report.
///
/// Mountains are blended on the pipeline's own grid, so the sink is written
/// in one bulk commit and never read back per window.
fn run<S: TerrainSink + ?Sized>(
    sink: &mut S,
    seed: f64,
    config: &TerrainConfig,
) -> Result<(HeightGrid, GenerationReport), GenerationError> {
    let total_start = Instant::now();
    let resolution = validate(sink, seed, config)?;
    let mut metrics = GenerationMetrics::default();
    let noise = GradientNoise::new(config.noise_kind, config.noise_seed);

    info!(seed, resolution, "Generating terrain");

    let start = Instant::now();
    let mut heights = BaseHeightGenerator::new(&noise)
        .with_params(config.base)
        .with_base_height(config.base_terrain_height)
        .generate(resolution, seed)?;
    metrics.base_ms = elapsed_ms(start);

    let start = Instant::now();
    let selector = PeakSelector::new(config.peaks.count, config.mountain_resolution as f64);
    let peaks = match selector.select(&heights) {
        Ok(peaks) => peaks,
        Err(PeakSelectionError::DegenerateSelection { requested, found })
            if config.peaks.allow_partial =>
        {
            warn!(requested, found = found.len(), "Continuing with a partial peak set");
            PeakSet::new(found)
        }
        Err(e) => return Err(e.into()),
    };
    metrics.peaks_ms = elapsed_ms(start);

    let start = Instant::now();
    let blend = MountainBlender::new(&noise)
        .with_params(config.mountains)
        .with_window(config.mountain_resolution)
        .blend(&mut heights, &peaks, seed);
    metrics.mountains_ms = elapsed_ms(start);

    sink.set_height_region(0, 0, &heights)?;
    let height_range = heights.min_max();
    info!(
        peaks = peaks.len(),
        skipped = blend.skipped.len(),
        ?height_range,
        "Heights committed"
    );

    let splat_anomalies = if config.splat.enabled {
        let start = Instant::now();
        let result = SplatDeriver::from_config(&config.splat).paint(sink)?;
        metrics.splat_ms = elapsed_ms(start);
        Some(AnomalySummary::from_anomalies(&result.anomalies))
    } else {
        None
    };

    let placements = if config.scatter.enabled {
        let start = Instant::now();
        let planner = ScatterPlanner::new(&config.scatter, config.mountain_resolution as f64);
        let placements = planner.plan(&*sink, &peaks, seed);
        metrics.scatter_ms = elapsed_ms(start);
        placements
    } else {
        Vec::new()
    };

    metrics.total_ms = elapsed_ms(total_start);

    let report = GenerationReport {
        seed,
        resolution,
        peaks,
        skipped_peaks: blend.skipped,
        height_range,
        splat_anomalies,
        placements,
        metrics,
    };

    Ok((heights, report))
}

/// Generates terrain into `sink` in one run.
///
/// Identical `seed` and `config` against an identically initialised sink give
/// identical results. On error the sink may hold partial output; call again to retry.
pub fn generate<S: TerrainSink + ?Sized>(
    sink: &mut S,
    seed: f64,
    config: &TerrainConfig,
) -> Result<GenerationReport, GenerationError> {
    run(sink, seed, config).map(|(_, report)| report)
}

/// Owns a sink, the configuration, the current seed and the last result.
///
/// # Example
///
/// ```rust,ignore
/// let mut pipeline = TerrainPipeline::new(TerrainConfig::default(), MemoryTerrain::new(513, 512))?
///     .with_seed(0.0);
/// pipeline.generate()?;
/// pipeline.increase_seed()?;
/// ```
pub struct TerrainPipeline<S> {
    config: TerrainConfig,
    sink: S,
    seed: f64,
    peaks: PeakSet,
    heights: Option<HeightGrid>,
}

impl<S: TerrainSink> TerrainPipeline<S> {
    /// Creates a pipeline with seed 0. The config is checked up front.
    pub fn new(config: TerrainConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            seed: 0.0,
            peaks: PeakSet::default(),
            heights: None,
        })
    }

    /// Sets the seed for the next run.
    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Peaks of the last successful run.
    pub fn peaks(&self) -> &PeakSet {
        &self.peaks
    }

    /// Heights committed by the last successful run.
    pub fn heights(&self) -> Option<&HeightGrid> {
        self.heights.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the full pipeline with the current seed.
    pub fn generate(&mut self) -> Result<GenerationReport, GenerationError> {
        let (heights, report) = run(&mut self.sink, self.seed, &self.config)?;
        self.peaks = report.peaks.clone();
        self.heights = Some(heights);
        Ok(report)
    }

    /// Shifts the seed by `delta` and regenerates. The new seed is kept even
    /// if the run fails.
    pub fn regenerate_with_seed_delta(
        &mut self,
        delta: f64,
    ) -> Result<GenerationReport, GenerationError> {
        self.seed += delta;
        self.generate()
    }

    /// Regenerates with the seed raised by [`SEED_STEP`].
    pub fn increase_seed(&mut self) -> Result<GenerationReport, GenerationError> {
        self.regenerate_with_seed_delta(SEED_STEP)
    }

    /// Regenerates with the seed lowered by [`SEED_STEP`].
    pub fn decrease_seed(&mut self) -> Result<GenerationReport, GenerationError> {
        self.regenerate_with_seed_delta(-SEED_STEP)
    }
}
