//! Generates a terrain into memory and logs a summary.
//!
//! Run with:
//! ```
//! TERRAIN_SEED=20 cargo run -p terrain-gen --bin terrain-generate -- config.json
//! ```
//!
//! Environment:
//! - `TERRAIN_SEED`: run seed (default 0)
//! - `TERRAIN_RESOLUTION`: heightmap side length (default 513)
//! - `TERRAIN_ALPHAMAP`: alphamap side length (default 512)
//! - `TERRAIN_REPORT`: write the generation report as JSON to this path

use std::str::FromStr;

use terrain_gen::config::TerrainConfig;
use terrain_gen::pipeline::generate;
use terrain_gen::sink::MemoryTerrain;
use tracing_subscriber::EnvFilter;

fn env_or<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => Ok(value.parse()?),
        Err(_) => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading config from {path}");
            TerrainConfig::from_json_file(&path)?
        }
        None => TerrainConfig::default(),
    };

    let seed: f64 = env_or("TERRAIN_SEED", 0.0)?;
    let resolution: usize = env_or("TERRAIN_RESOLUTION", 513)?;
    let alphamap: usize = env_or("TERRAIN_ALPHAMAP", 512)?;

    let mut terrain = MemoryTerrain::new(resolution, alphamap);
    let report = generate(&mut terrain, seed, &config)?;

    // Summary output
    tracing::info!("Generation completed in {}ms", report.metrics.total_ms);
    for (i, peak) in report.peaks.iter().enumerate() {
        tracing::info!("  Peak {}: ({}, {})", i, peak.x, peak.y);
    }
    for skipped in &report.skipped_peaks {
        tracing::warn!("  Skipped ({}, {}): {}", skipped.peak.x, skipped.peak.y, skipped.reason);
    }
    if let Some((min, max)) = report.height_range {
        tracing::info!("  Heights: {:.4} .. {:.4}", min, max);
    }
    if let Some(anomalies) = report.splat_anomalies {
        tracing::info!("  Splat anomalies: {}", anomalies.total());
    }
    if config.scatter.enabled {
        tracing::info!("  Placements: {}", report.placements.len());
    }

    if let Ok(path) = std::env::var("TERRAIN_REPORT") {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!("Report written to {path}");
    }

    Ok(())
}
