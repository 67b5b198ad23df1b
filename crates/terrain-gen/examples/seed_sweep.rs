//! Example: step through seeds and compare the resulting terrains.
//!
//! Generates a 257x257 terrain, then raises the seed five times by the
//! standard step, logging where the mountains land and how tall they get.
//!
//! Run with:
//! ```
//! cargo run --example seed_sweep
//! ```

use terrain_gen::config::TerrainConfig;
use terrain_gen::pipeline::TerrainPipeline;
use terrain_gen::sink::MemoryTerrain;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = TerrainConfig::default()
        .with_mountain_resolution(64)
        .with_scatter(4);
    let mut pipeline = TerrainPipeline::new(config, MemoryTerrain::new(257, 256))?;

    let mut report = pipeline.generate()?;
    for step in 0..=5 {
        if step > 0 {
            report = pipeline.increase_seed()?;
        }
        let (min, max) = report.height_range.unwrap_or_default();
        tracing::info!(
            "Seed {:>4}: peaks {:?}, heights {:.3}..{:.3}, {} placements",
            report.seed,
            report.peaks.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>(),
            min,
            max,
            report.placements.len()
        );
    }

    Ok(())
}
