//! Mountain peak selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PeakSelectionError;
use crate::grid::HeightGrid;

/// A heightmap cell chosen as a mountain centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peak {
    pub x: usize,
    pub y: usize,
}

impl Peak {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in cells.
    pub fn distance(&self, other: &Peak) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// Peaks in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeakSet(Vec<Peak>);

impl PeakSet {
    pub fn new(peaks: Vec<Peak>) -> Self {
        Self(peaks)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Peak] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peak> {
        self.0.iter()
    }

    /// Smallest pairwise distance, or `None` with fewer than two peaks.
    pub fn min_separation(&self) -> Option<f64> {
        let mut min: Option<f64> = None;
        for (i, a) in self.0.iter().enumerate() {
            for b in &self.0[i + 1..] {
                let d = a.distance(b);
                min = Some(min.map_or(d, |m| m.min(d)));
            }
        }
        min
    }

    /// Whether `point` is more than `radius` away from every peak.
    pub fn is_clear_of(&self, point: &Peak, radius: f64) -> bool {
        self.0.iter().all(|p| p.distance(point) > radius)
    }
}

impl<'a> IntoIterator for &'a PeakSet {
    type Item = &'a Peak;
    type IntoIter = std::slice::Iter<'a, Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Picks the highest cells that are mutually more than `min_separation` apart.
///
/// Each pick is a full row-major scan (y outer, x inner). Among eligible
/// cells the strictly greatest height wins, so ties go to the first cell
/// scanned. The first eligible cell starts the running maximum, which makes
/// flat and negative regions valid candidates.
#[derive(Debug, Clone, Copy)]
pub struct PeakSelector {
    count: usize,
    min_separation: f64,
}

impl PeakSelector {
    pub fn new(count: usize, min_separation: f64) -> Self {
        Self {
            count,
            min_separation,
        }
    }

    /// Selects exactly `count` peaks.
    ///
    /// Fails with [`PeakSelectionError::DegenerateSelection`] when a pick
    /// finds no cell clear of the peaks already chosen; the error carries
    /// those peaks.
    pub fn select(&self, grid: &HeightGrid) -> Result<PeakSet, PeakSelectionError> {
        let mut chosen = PeakSet::new(Vec::with_capacity(self.count));

        while chosen.len() < self.count {
            match self.next_peak(grid, &chosen) {
                Some(peak) => {
                    let height = grid.get(peak.x, peak.y);
                    debug!(x = peak.x, y = peak.y, height, "Peak selected");
                    chosen.0.push(peak);
                }
                None => {
                    return Err(PeakSelectionError::DegenerateSelection {
                        requested: self.count,
                        found: chosen.0,
                    });
                }
            }
        }

        Ok(chosen)
    }

    fn next_peak(&self, grid: &HeightGrid, chosen: &PeakSet) -> Option<Peak> {
        let mut best: Option<(Peak, f64)> = None;

        for (x, y, height) in grid.cells() {
            if best.is_some_and(|(_, top)| height <= top) {
                continue;
            }
            let candidate = Peak::new(x, y);
            if chosen.is_clear_of(&candidate, self.min_separation) {
                best = Some((candidate, height));
            }
        }

        best.map(|(peak, _)| peak)
    }
}
