//! Document-wide font size statistics.

use crate::model::Fragment;

/// Mean font size assumed before any sizes are observed.
pub const DEFAULT_MEAN_SIZE: f32 = 12.0;

/// Size thresholds derived from the document's font size distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeThresholds {
    /// 25th percentile
    pub small: f32,
    /// Mean size
    pub medium: f32,
    /// 75th percentile
    pub large: f32,
    /// 1.5 x the 75th percentile
    pub very_large: f32,
}

impl SizeThresholds {
    /// Thresholds used when the document has no usable font sizes.
    pub const FALLBACK: SizeThresholds = SizeThresholds {
        small: 12.0,
        medium: 12.0,
        large: 14.0,
        very_large: 18.0,
    };
}

/// Font statistics for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStatistics {
    /// Arithmetic mean of all positive font sizes
    pub mean_size: f32,
    /// Percentile thresholds, absent when no sizes were observed
    pub thresholds: Option<SizeThresholds>,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self {
            mean_size: DEFAULT_MEAN_SIZE,
            thresholds: None,
        }
    }
}

impl FontStatistics {
    /// Compute statistics over every fragment with a positive font size.
    ///
    /// With no such fragments the defaults are kept.
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        Self::from_sizes(fragments.iter().map(|f| f.font_size))
    }

    /// Compute statistics from raw font sizes, ignoring non-positive values.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>) -> Self {
        let mut sizes: Vec<f32> = sizes.into_iter().filter(|s| *s > 0.0).collect();
        if sizes.is_empty() {
            return Self::default();
        }

        sizes.sort_by(f32::total_cmp);
        let n = sizes.len();
        // Summed in f64 so long runs of one size keep mean == that size
        let mean_size = (sizes.iter().map(|&s| f64::from(s)).sum::<f64>() / n as f64) as f32;
        let small = sizes[n / 4];
        let large = sizes[3 * n / 4];

        Self {
            mean_size,
            thresholds: Some(SizeThresholds {
                small,
                medium: mean_size,
                large,
                very_large: large * 1.5,
            }),
        }
    }

    /// Font size relative to the document mean, unless the mean is unusable.
    pub fn relative_size(&self, font_size: f32) -> Option<f32> {
        (self.mean_size > 0.0).then(|| font_size / self.mean_size)
    }

    /// Thresholds, or the fixed fallback when none were computed.
    pub fn thresholds_or_fallback(&self) -> SizeThresholds {
        self.thresholds.unwrap_or(SizeThresholds::FALLBACK)
    }
}
