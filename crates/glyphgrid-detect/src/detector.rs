use glyphgrid_core::{CellBox, GrayImageView, GridInfo, ImageFrame};

use crate::bands::{find_bands, merge_fragments, select_regular_run};
use crate::columns::{grid_extent, slot_centers};
use crate::params::DetectorParams;
use crate::projection::{Projector, Strategy};
use crate::target::locate_target;

/// Grid and target strip detector.
#[derive(Clone, Debug, Default)]
pub struct GridDetector {
    params: DetectorParams,
}

impl GridDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Detect the grid in an RGBA frame.
    pub fn detect(&self, frame: &ImageFrame) -> Option<GridInfo> {
        let gray = frame.to_gray();
        self.detect_gray(&gray.view())
    }

    /// Detect the grid in a grayscale frame.
    ///
    /// Runs the adaptive-threshold strategy first. The detrended strategy is
    /// tried when that finds no grid, or finds a grid without a target strip;
    /// its result is used only if it is strictly better.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "info", skip_all, fields(w = gray.width, h = gray.height))
    )]
    pub fn detect_gray(&self, gray: &GrayImageView<'_>) -> Option<GridInfo> {
        let primary = self.detect_with_strategy(gray, Strategy::Adaptive);
        if !self.params.fallback_detrended || primary.as_ref().is_some_and(GridInfo::has_target) {
            return primary;
        }
        let missing = if primary.is_some() { "target" } else { "grid" };
        log::debug!("adaptive strategy found no {missing}, trying detrended projection");
        let secondary = self.detect_with_strategy(gray, Strategy::Detrended);
        match (primary, secondary) {
            (None, secondary) => secondary,
            (Some(_), Some(s)) if s.has_target() => Some(s),
            (primary, _) => primary,
        }
    }

    /// Detect with one projection strategy, no fallback.
    pub fn detect_with_strategy(
        &self,
        gray: &GrayImageView<'_>,
        strategy: Strategy,
    ) -> Option<GridInfo> {
        let p = &self.params;
        debug_assert!(p.rows >= 2 && p.cols >= 1, "grid {}x{}", p.rows, p.cols);
        if p.rows < 2 || p.cols == 0 || gray.width == 0 || gray.height == 0 {
            return None;
        }

        let projector = Projector::new(*gray, strategy, p);
        let raw = find_bands(&projector.rows(), p.bands.min_rows);
        let bands = merge_fragments(raw, &p.bands, p.rows);
        log::debug!("{strategy:?}: {} text bands", bands.len());

        let Some(run) = select_regular_run(&bands, p.rows, &p.bands) else {
            log::debug!("{strategy:?}: no regular run of {} bands", p.rows);
            return None;
        };
        let rows = &bands[run.first..run.first + p.rows];
        let y0 = rows[0].start;
        let y1 = rows[rows.len() - 1].end;

        let (extent, density) = grid_extent(&projector, y0, y1, run.spacing, &p.columns)?;
        let pitch = extent.width() as f32 / p.cols as f32;
        let centers = slot_centers(
            &density,
            extent.x0 as f32,
            pitch,
            p.cols,
            p.columns.refine_slots,
        );
        let w = p.cell_width_frac * pitch;
        let h = p.cell_height_frac * run.spacing;
        let grid_cells: Vec<CellBox> = rows
            .iter()
            .flat_map(|row| {
                let cy = row.center();
                centers
                    .iter()
                    .map(move |&cx| CellBox::from_center(cx, cy, w, h))
            })
            .collect();

        let target_cells = locate_target(&projector, &bands, y0, extent, run.spacing, p);
        log::debug!(
            "{strategy:?}: grid x {}..={} y {}..={}, pitch {:.1}, target {}",
            extent.x0,
            extent.x1,
            y0,
            y1,
            pitch,
            target_cells.as_ref().map_or("missing", |_| "found")
        );

        Some(GridInfo {
            grid_cells,
            target_cells,
            rows: p.rows,
            cols: p.cols,
        })
    }
}
