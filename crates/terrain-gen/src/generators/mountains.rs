//! Mountain blending around selected peaks.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::NoiseParams;
use crate::errors::RegionError;
use crate::generators::peaks::{Peak, PeakSet};
use crate::grid::HeightGrid;
use crate::terrain::{NoiseSource, OctaveNoise};

/// A peak whose window could not be blended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPeak {
    pub peak: Peak,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: RegionError,
}

fn serialize_reason<S: serde::Serializer>(reason: &RegionError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(reason)
}

/// Result of a blending pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlendOutcome {
    /// Peaks whose windows were written, in processing order.
    pub applied: Vec<Peak>,
    /// Peaks whose windows fell outside the grid.
    pub skipped: Vec<SkippedPeak>,
}

/// Adds radially faded mountain noise in a square window around each peak.
///
/// The window has side `window` and its top-left corner sits at
/// `peak - window / 2`. Inside it the octave sum is sampled in window-local
/// coordinates and scaled by a linear falloff that is 1 at the centre and 0
/// from `window / 2` outwards.
#[derive(Debug, Clone)]
pub struct MountainBlender<N> {
    noise: N,
    params: NoiseParams,
    window: usize,
}

impl<N: NoiseSource> MountainBlender<N> {
    /// Creates a blender with the reference mountain tuning and a 100-cell window.
    pub fn new(noise: N) -> Self {
        Self {
            noise,
            params: NoiseParams::mountains(),
            window: 100,
        }
    }

    /// Sets the noise schedule.
    pub fn with_params(mut self, params: NoiseParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the window side length.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    fn half_extent(&self) -> f64 {
        (self.window / 2) as f64
    }

    /// Linear falloff at window-local `(x, y)`.
    pub fn falloff(&self, x: usize, y: usize) -> f64 {
        let half = self.half_extent();
        if half == 0.0 {
            // A one-cell window is all centre.
            return 1.0;
        }
        let distance = (x as f64 - half).hypot(y as f64 - half);
        (1.0 - distance / half).max(0.0)
    }

    /// Mountain contribution at window-local `(x, y)`.
    pub fn mountain_height(&self, x: usize, y: usize, seed: f64) -> f64 {
        let falloff = self.falloff(x, y);
        if falloff == 0.0 {
            return 0.0;
        }
        let octaves = OctaveNoise::new(&self.noise, self.params);
        octaves.sum(x as f64, y as f64, seed, self.window as f64) * falloff
    }

    /// Grid coordinate of the window's top-left corner for `peak`.
    pub fn window_origin(&self, peak: &Peak) -> (i64, i64) {
        let half = (self.window / 2) as i64;
        (peak.x as i64 - half, peak.y as i64 - half)
    }

    /// Builds the additive contribution for one window.
    fn contribution(&self, seed: f64) -> HeightGrid {
        let mut patch = HeightGrid::square(self.window);
        for y in 0..self.window {
            for x in 0..self.window {
                patch.set(x, y, self.mountain_height(x, y, seed));
            }
        }
        patch
    }

    /// Blends every peak into `grid`, in order.
    ///
    /// A window that does not fit the grid skips its peak; the remaining
    /// peaks are still processed. Overlapping windows accumulate.
    pub fn blend(&self, grid: &mut HeightGrid, peaks: &PeakSet, seed: f64) -> BlendOutcome {
        let mut outcome = BlendOutcome::default();
        if peaks.is_empty() {
            return outcome;
        }

        // Every window samples the same local coordinates.
        let contribution = self.contribution(seed);

        for peak in peaks {
            let (x0, y0) = self.window_origin(peak);

            let result = grid
                .region(x0, y0, self.window, self.window)
                .and_then(|mut window| {
                    for (x, y, delta) in contribution.cells() {
                        window.add(x, y, delta);
                    }
                    grid.write_region(x0, y0, &window)
                });

            match result {
                Ok(()) => {
                    debug!(x = peak.x, y = peak.y, window = self.window, "Mountain blended");
                    outcome.applied.push(*peak);
                }
                Err(reason) => {
                    warn!(x = peak.x, y = peak.y, "Skipping mountain: {reason}");
                    outcome.skipped.push(SkippedPeak {
                        peak: *peak,
                        reason,
                    });
                }
            }
        }

        outcome
    }
}
