//! End-to-end tests for terrain generation against the in-memory sink.
//!
//! These cover the properties a caller relies on:
//! - identical inputs give bit-identical heights and weights
//! - peaks stay more than the mountain resolution apart
//! - splat weights are non-negative and sum to one
//! - out-of-bounds mountain windows are skipped without aborting the run
//!
//! Run with: `cargo nextest run -p terrain-gen --test generation`

use terrain_gen::config::TerrainConfig;
use terrain_gen::generators::{Peak, PeakSelector};
use terrain_gen::grid::HeightGrid;
use terrain_gen::pipeline::{TerrainPipeline, generate};
use terrain_gen::sink::{MemoryTerrain, TerrainSampler};
use terrain_gen::terrain::{GradientNoise, NoiseSource};

fn bits(grid: &HeightGrid) -> Vec<u64> {
    grid.values().iter().map(|v| v.to_bits()).collect()
}

fn small_config() -> TerrainConfig {
    TerrainConfig::default().with_mountain_resolution(30)
}

#[test]
fn test_generation_is_deterministic() {
    let config = small_config().with_scatter(3);

    let mut a = MemoryTerrain::new(129, 64);
    let mut b = MemoryTerrain::new(129, 64);
    let report_a = generate(&mut a, 40.0, &config).unwrap();
    let report_b = generate(&mut b, 40.0, &config).unwrap();

    assert_eq!(bits(a.heights()), bits(b.heights()));
    assert_eq!(a.alphamap(), b.alphamap());
    assert_eq!(report_a.peaks, report_b.peaks);
    assert_eq!(report_a.placements, report_b.placements);
}

#[test]
fn test_rerun_on_same_sink_is_idempotent() {
    let config = small_config();
    let mut terrain = MemoryTerrain::new(97, 32);

    generate(&mut terrain, 3.0, &config).unwrap();
    let first = terrain.heights().clone();
    generate(&mut terrain, 3.0, &config).unwrap();

    assert_eq!(bits(terrain.heights()), bits(&first));
}

#[test]
fn test_seed_changes_terrain() {
    let config = small_config();
    let mut a = MemoryTerrain::new(97, 32);
    let mut b = MemoryTerrain::new(97, 32);
    generate(&mut a, 0.0, &config).unwrap();
    generate(&mut b, 10.0, &config).unwrap();

    assert_ne!(a.heights(), b.heights());
}

#[test]
fn test_peaks_are_separated_across_seeds() {
    let config = small_config().with_peak_count(4);

    for seed in [0.0, 10.0, 20.0, -30.0, 123.5] {
        let mut terrain = MemoryTerrain::new(129, 32);
        let report = generate(&mut terrain, seed, &config).unwrap();

        assert_eq!(report.peaks.len(), 4);
        let peaks = report.peaks.as_slice();
        for (i, p) in peaks.iter().enumerate() {
            for q in &peaks[i + 1..] {
                assert!(
                    p.distance(q) > 30.0,
                    "seed {seed}: {p:?} and {q:?} are too close"
                );
            }
        }
    }
}

#[test]
fn test_splat_weights_are_normalized() {
    let mut terrain = MemoryTerrain::new(129, 100);
    generate(&mut terrain, 7.0, &small_config()).unwrap();

    let alphamap = terrain.alphamap();
    for y in 0..alphamap.height() {
        for x in 0..alphamap.width() {
            let cell = alphamap.cell(x, y);
            assert!(cell.iter().all(|&w| w >= 0.0), "negative weight at ({x}, {y})");
            let sum: f64 = cell.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "weights at ({x}, {y}) sum to {sum}");
        }
    }
}

#[test]
fn test_cliff_never_produces_negative_weights() {
    // A step from 0 to full height between two columns.
    let resolution = 33;
    let mut heights = HeightGrid::square(resolution);
    for y in 0..resolution {
        for x in 17..resolution {
            heights.set(x, y, 1.0);
        }
    }
    let terrain = MemoryTerrain::new(resolution, 32)
        .with_heights(heights)
        .unwrap();
    assert!(terrain.sample_slope_degrees_at(0.5, 0.5) > 45.0);

    let dims = terrain_gen::sink::AlphamapDimensions {
        width: 32,
        height: 32,
        layers: 3,
    };
    let result = terrain_gen::generators::SplatDeriver::default()
        .derive(&terrain, dims)
        .unwrap();

    assert!(!result.anomalies.is_empty());
    for y in 0..32 {
        for x in 0..32 {
            assert!(result.weights.cell(x, y).iter().all(|&w| w >= 0.0));
        }
    }
}

#[test]
fn test_reference_origin_height() {
    let config = TerrainConfig::default().with_peak_count(0).with_splat(false);
    let mut terrain = MemoryTerrain::new(513, 8);
    generate(&mut terrain, 0.0, &config).unwrap();

    let noise = GradientNoise::perlin();
    let mut octave_sum = 0.0;
    let mut frequency = 4.0;
    let mut amplitude = 0.01;
    for _ in 0..8 {
        octave_sum += noise.sample(0.0 * frequency, 0.0 * frequency) * amplitude;
        frequency *= 1.5;
        amplitude *= 0.5;
    }

    let origin = terrain.heights().get(0, 0);
    assert_eq!(origin, 0.05 + octave_sum);
    // Perlin is 0.5 on every lattice point.
    assert!((origin - (0.05 + 0.01 * (1.0 - 0.5f64.powi(8)))).abs() < 1e-12);
}

#[test]
fn test_non_square_heights_never_reach_generation() {
    let result = MemoryTerrain::new(33, 8).with_heights(HeightGrid::new(33, 9));
    assert!(matches!(
        result,
        Err(terrain_gen::errors::ConfigError::NonSquareHeightmap {
            width: 33,
            height: 9
        })
    ));
}

#[test]
fn test_single_spike_peaks_and_window_skips() {
    let mut heights = HeightGrid::square(513);
    heights.set(256, 256, 1.0);

    let peaks = PeakSelector::new(3, 100.0).select(&heights).unwrap();
    assert_eq!(
        peaks.as_slice(),
        &[Peak::new(256, 256), Peak::new(0, 0), Peak::new(101, 0)]
    );

    // Only the centre peak has room for a 100-cell window.
    let blend = terrain_gen::generators::MountainBlender::new(GradientNoise::perlin())
        .with_window(100)
        .blend(&mut heights, &peaks, 0.0);

    assert_eq!(blend.applied, vec![Peak::new(256, 256)]);
    assert_eq!(
        blend
            .skipped
            .iter()
            .map(|s| s.peak)
            .collect::<Vec<_>>(),
        vec![Peak::new(0, 0), Peak::new(101, 0)]
    );
    assert!(heights.get(256, 256) > 1.0);
    assert_eq!(heights.get(0, 0), 0.0);
}

#[test]
fn test_scatter_keeps_clear_of_mountains() {
    let config = small_config().with_scatter(2);
    let mut terrain = MemoryTerrain::new(257, 32);
    let report = generate(&mut terrain, 11.0, &config).unwrap();

    assert!(!report.placements.is_empty());
    for placement in &report.placements {
        assert_eq!(placement.x % 50, 0);
        assert_eq!(placement.y % 50, 0);
        for peak in report.peaks.iter() {
            assert!(peak.distance(&Peak::new(placement.x, placement.y)) > 30.0);
        }
        assert_eq!(
            placement.height,
            terrain.sample_height_at(placement.x, placement.y)
        );
    }
}

#[test]
fn test_pipeline_seed_round_trip() {
    let mut pipeline = TerrainPipeline::new(small_config(), MemoryTerrain::new(97, 32))
        .unwrap()
        .with_seed(100.0);

    let original = pipeline.generate().unwrap();
    let original_heights = pipeline.heights().cloned().unwrap();

    let lowered = pipeline.decrease_seed().unwrap();
    assert_eq!(lowered.seed, 90.0);

    let restored = pipeline.regenerate_with_seed_delta(10.0).unwrap();
    assert_eq!(restored.peaks, original.peaks);
    assert_eq!(pipeline.peaks(), &original.peaks);
    assert_eq!(
        bits(pipeline.heights().unwrap()),
        bits(&original_heights)
    );
    assert_eq!(pipeline.into_sink().heights(), &original_heights);
}
