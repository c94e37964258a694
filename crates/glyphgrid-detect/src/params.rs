use glyphgrid_core::{AdaptiveThresholdParams, GRID_COLS, GRID_ROWS};
use serde::{Deserialize, Serialize};

/// Text band extraction from the row profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandParams {
    /// Minimum fraction of ink pixels for a row to belong to a band.
    pub min_density: f32,
    /// Bands thinner than this many rows are dropped.
    pub min_rows: usize,
    /// Smallest ratio between consecutive sorted gaps that separates
    /// within-glyph gaps from between-row gaps.
    pub merge_jump_ratio: f32,
    /// Merge threshold relative to the median gap when no jump is found.
    pub merge_median_frac: f32,
    /// Maximum std/mean of the row spacing within the selected run.
    pub max_spacing_cv: f32,
    /// Minimum mean density of the selected run.
    pub min_run_density: f32,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            min_density: 0.02,
            min_rows: 3,
            merge_jump_ratio: 2.0,
            merge_median_frac: 0.5,
            max_spacing_cv: 0.25,
            min_run_density: 0.03,
        }
    }
}

/// Horizontal extent of the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnParams {
    /// Smoothing window for the column variance, relative to row spacing.
    pub smooth_rel: f32,
    /// Fraction of the smoothed peak a column must exceed.
    pub peak_frac: f32,
    /// Raw column ink density used to trim the region and center slots.
    pub min_density: f32,
    /// Move each slot center to the midpoint of the ink inside the slot.
    /// When off, slots are the equal partition of the grid extent.
    pub refine_slots: bool,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self {
            smooth_rel: 1.5,
            peak_frac: 0.15,
            min_density: 0.005,
            refine_slots: true,
        }
    }
}

/// Target strip search above the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    /// Accepted ink width range, relative to the grid width.
    pub min_width_frac: f32,
    pub max_width_frac: f32,
    /// Maximum offset of the band center from the grid center, relative to grid width.
    pub max_center_offset: f32,
    /// How far above the first grid row to look, in row spacings.
    pub max_distance: f32,
    /// Cell height relative to the band height.
    pub height_frac: f32,
    /// Horizontal search margin around the grid, relative to grid width.
    pub search_margin: f32,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            min_width_frac: 0.2,
            max_width_frac: 0.65,
            max_center_offset: 0.3,
            max_distance: 4.0,
            height_frac: 1.3,
            search_margin: 0.1,
        }
    }
}

/// Raw-brightness projection used by the fallback strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetrendParams {
    /// Trend window as a fraction of the frame height (at least 9 rows).
    pub window_frac: f32,
    /// Row threshold as a multiple of the detrended profile RMS.
    pub rms_factor: f32,
    /// Column threshold on the max-normalized variance.
    pub column_threshold: f32,
}

impl Default for DetrendParams {
    fn default() -> Self {
        Self {
            window_frac: 1.0 / 6.0,
            rms_factor: 0.25,
            column_threshold: 0.1,
        }
    }
}

/// Configuration for [`crate::GridDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub threshold: AdaptiveThresholdParams,
    pub bands: BandParams,
    pub columns: ColumnParams,
    pub target: TargetParams,
    pub detrend: DetrendParams,
    /// Grid shape. The matcher assumes 8 x 10; other shapes are for
    /// experiments only.
    pub rows: usize,
    pub cols: usize,
    /// Cell size relative to column pitch and row spacing.
    pub cell_width_frac: f32,
    pub cell_height_frac: f32,
    /// Retry with the detrended projection when thresholding fails.
    pub fallback_detrended: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            threshold: AdaptiveThresholdParams::default(),
            bands: BandParams::default(),
            columns: ColumnParams::default(),
            target: TargetParams::default(),
            detrend: DetrendParams::default(),
            rows: GRID_ROWS,
            cols: GRID_COLS,
            cell_width_frac: 0.9,
            cell_height_frac: 0.85,
            fallback_detrended: true,
        }
    }
}
