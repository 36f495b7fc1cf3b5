//! Directional clearance estimates from a range scan.
//!
//! Reduces a full-circle scan to five named sector means used by the
//! avoidance policy: front, oblique-left, oblique-right, left, right.
//! Sector extents are static configuration in degrees and are converted to
//! sample index ranges once, when the preprocessor is built.

use serde::Deserialize;

use crate::error::{RakshaError, Result};
use crate::types::RangeScan;

/// Angular extents of the clearance sectors, in degrees.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SectorConfig {
    /// Width of each front boundary slice (default: 20)
    #[serde(default = "default_front_width")]
    pub front_width_deg: f32,

    /// Width of the oblique slices adjacent to forward (default: 70)
    #[serde(default = "default_oblique_width")]
    pub oblique_width_deg: f32,

    /// Width of the side slices (default: 55)
    #[serde(default = "default_side_width")]
    pub side_width_deg: f32,

    /// Offset of the side slices from the forward axis (default: 30)
    #[serde(default = "default_side_offset")]
    pub side_offset_deg: f32,
}

fn default_front_width() -> f32 {
    20.0
}
fn default_oblique_width() -> f32 {
    70.0
}
fn default_side_width() -> f32 {
    55.0
}
fn default_side_offset() -> f32 {
    30.0
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            front_width_deg: default_front_width(),
            oblique_width_deg: default_oblique_width(),
            side_width_deg: default_side_width(),
            side_offset_deg: default_side_offset(),
        }
    }
}

/// The five sector means for one control cycle, in meters.
///
/// Derived data; recomputed from the latest scan every cycle and not
/// persisted beyond it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearanceSnapshot {
    /// Frontal distance-to-collision. Sum of the mean over the first front
    /// slice and half the mean over the last front slice (inherited
    /// asymmetric aggregation, preserved for behavioral parity).
    pub front: f32,
    pub oblique_left: f32,
    pub oblique_right: f32,
    pub left: f32,
    pub right: f32,
    /// Minimum clamped sample over the whole scan
    pub min_range: f32,
}

/// Converts a range scan into a [`ClearanceSnapshot`].
#[derive(Clone, Debug)]
pub struct RangePreprocessor {
    scan_size: usize,
    /// Sector widths/offset in samples
    front_width: usize,
    oblique_width: usize,
    side_width: usize,
    side_offset: usize,
}

impl RangePreprocessor {
    /// Build a preprocessor for scans of `scan_size` samples.
    ///
    /// Fails if the configured sector geometry produces an empty or
    /// out-of-bounds index range at this resolution.
    pub fn new(config: &SectorConfig, scan_size: usize) -> Result<Self> {
        let samples_per_deg = scan_size as f32 / 360.0;
        let to_samples = |deg: f32| (deg * samples_per_deg).round() as usize;

        let front_width = to_samples(config.front_width_deg);
        let oblique_width = to_samples(config.oblique_width_deg);
        let side_width = to_samples(config.side_width_deg);
        let side_offset = to_samples(config.side_offset_deg);

        if front_width == 0 || oblique_width == 0 || side_width == 0 {
            return Err(RakshaError::Config(format!(
                "sector geometry degenerates to an empty slice at {} samples/scan",
                scan_size
            )));
        }
        if front_width > scan_size
            || oblique_width > scan_size
            || side_offset + side_width > scan_size
        {
            return Err(RakshaError::Config(format!(
                "sector geometry exceeds scan bounds at {} samples/scan",
                scan_size
            )));
        }

        Ok(Self {
            scan_size,
            front_width,
            oblique_width,
            side_width,
            side_offset,
        })
    }

    /// Compute sector means over the scan's fixed index ranges.
    ///
    /// A scan of unexpected length, or one containing negative or NaN
    /// samples, violates the capture contract and fails fast rather than
    /// producing degenerate means.
    pub fn preprocess(&self, scan: &RangeScan) -> Result<ClearanceSnapshot> {
        if scan.len() != self.scan_size {
            return Err(RakshaError::InvalidScan(format!(
                "expected {} samples, got {}",
                self.scan_size,
                scan.len()
            )));
        }

        let ranges = scan.ranges();
        let mut min_range = f32::MAX;
        for (i, &r) in ranges.iter().enumerate() {
            if !r.is_finite() || r < 0.0 {
                return Err(RakshaError::InvalidScan(format!(
                    "unclamped sample {} at index {}",
                    r, i
                )));
            }
            min_range = min_range.min(r);
        }

        let n = self.scan_size;
        let front = mean(&ranges[0..self.front_width])
            + mean(&ranges[n - self.front_width..n]) / 2.0;
        let oblique_left = mean(&ranges[0..self.oblique_width]);
        let oblique_right = mean(&ranges[n - self.oblique_width..n]);
        let left = mean(&ranges[self.side_offset..self.side_offset + self.side_width]);
        let right =
            mean(&ranges[n - self.side_offset - self.side_width..n - self.side_offset]);

        Ok(ClearanceSnapshot {
            front,
            oblique_left,
            oblique_right,
            left,
            right,
            min_range,
        })
    }
}

fn mean(samples: &[f32]) -> f32 {
    samples.iter().sum::<f32>() / samples.len() as f32
}
