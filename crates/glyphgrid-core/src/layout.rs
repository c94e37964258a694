use serde::{Deserialize, Serialize};

use crate::image::PixelRect;

/// Default grid shape: 8 rows of 10 cells.
pub const GRID_ROWS: usize = 8;
pub const GRID_COLS: usize = 10;
/// Cells in the target strip.
pub const TARGET_CELLS: usize = 4;

/// Code of a cell that could not be read.
pub const UNREADABLE_CODE: &str = "??";

/// Smallest crop, per side, that is still worth normalizing.
pub const MIN_CROP_SIDE: usize = 3;

/// Axis-aligned cell rectangle in frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub cx: f32,
    pub cy: f32,
    pub area: f32,
}

impl CellBox {
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        debug_assert!(w > 0.0 && h > 0.0, "cell box must have positive size");
        Self {
            x: cx - 0.5 * w,
            y: cy - 0.5 * h,
            w,
            h,
            cx,
            cy,
            area: w * h,
        }
    }

    pub fn from_rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_center(x + 0.5 * w, y + 0.5 * h, w, h)
    }

    /// Integer pixel rect covering the box plus `margin` on each side,
    /// clipped to a `width` x `height` frame.
    ///
    /// Returns `None` when the clipped rect is smaller than 3x3.
    pub fn pixel_rect(&self, margin: usize, width: usize, height: usize) -> Option<PixelRect> {
        let m = margin as f32;
        let x0 = (self.x.floor() - m).max(0.0) as usize;
        let y0 = (self.y.floor() - m).max(0.0) as usize;
        let x1 = ((self.x + self.w).ceil() + m).max(0.0) as usize;
        let y1 = ((self.y + self.h).ceil() + m).max(0.0) as usize;
        let x1 = x1.min(width);
        let y1 = y1.min(height);
        if x1 < x0 + MIN_CROP_SIDE || y1 < y0 + MIN_CROP_SIDE {
            return None;
        }
        Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Detected grid and target strip geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridInfo {
    /// `rows * cols` boxes in row-major order.
    pub grid_cells: Vec<CellBox>,
    /// The target strip, absent when it could not be located.
    pub target_cells: Option<Vec<CellBox>>,
    pub rows: usize,
    pub cols: usize,
}

impl GridInfo {
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellBox> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.grid_cells.get(row * self.cols + col)
    }

    pub fn has_target(&self) -> bool {
        self.target_cells.is_some()
    }
}
