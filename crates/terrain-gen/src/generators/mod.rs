//! Terrain generation passes.
//!
//! Each pass is usable on its own; [`TerrainPipeline`](crate::pipeline::TerrainPipeline)
//! runs them in order:
//! - [`BaseHeightGenerator`]: octave-summed base heights
//! - [`PeakSelector`]: mutually distant maxima
//! - [`MountainBlender`]: radially faded mountain noise around each peak
//! - [`SplatDeriver`]: texture weights from height and slope
//! - [`ScatterPlanner`]: object positions away from the mountains

pub mod base;
pub mod mountains;
pub mod peaks;
pub mod scatter;
pub mod splat;

pub use base::BaseHeightGenerator;
pub use mountains::{BlendOutcome, MountainBlender, SkippedPeak};
pub use peaks::{Peak, PeakSelector, PeakSet};
pub use scatter::{Placement, ScatterPlanner};
pub use splat::{AnomalyKind, AnomalySummary, SplatDeriver, SplatResult, WeightAnomaly};
