//! Target strip search above the grid.

use glyphgrid_core::{CellBox, TARGET_CELLS};

use crate::bands::Band;
use crate::columns::{ink_extent, slot_centers, Extent};
use crate::params::DetectorParams;
use crate::projection::Projector;

/// Scan upward from the first grid row for a narrow, centered text band.
///
/// Adjacent qualifying bands closer than one row spacing are merged (tall
/// target glyphs can fragment). The first non-qualifying band after a hit
/// ends the search.
pub(crate) fn locate_target(
    projector: &Projector<'_>,
    bands: &[Band],
    grid_top: usize,
    grid: Extent,
    spacing: f32,
    params: &DetectorParams,
) -> Option<Vec<CellBox>> {
    let tp = &params.target;
    let width = projector.gray().width;
    let grid_w = grid.width() as f32;
    let lo = (grid.x0 as f32 - tp.search_margin * grid_w).max(0.0) as usize;
    let hi = (grid.x1 as f32 + tp.search_margin * grid_w).min(width as f32 - 1.0) as usize;

    let qualifies = |e: &Extent| {
        let ratio = e.width() as f32 / grid_w;
        (tp.min_width_frac..=tp.max_width_frac).contains(&ratio)
            && (e.center() - grid.center()).abs() <= tp.max_center_offset * grid_w
    };

    // (band rows, ink extent) accumulated from the bottom up
    let mut acc: Option<(Band, Extent)> = None;
    let above = bands
        .iter()
        .rev()
        .filter(|b| b.end < grid_top && (grid_top - b.end) as f32 <= tp.max_distance * spacing);
    for band in above {
        let extent = ink_extent(&projector.columns(band.start, band.end), lo, hi).filter(qualifies);
        match (extent, acc.as_mut()) {
            (Some(e), None) => acc = Some((*band, e)),
            (Some(e), Some((rows, ext))) => {
                if ((rows.start - band.end - 1) as f32) >= spacing {
                    break;
                }
                rows.start = band.start;
                ext.x0 = ext.x0.min(e.x0);
                ext.x1 = ext.x1.max(e.x1);
            }
            (None, Some(_)) => break,
            (None, None) => {}
        }
    }

    let Some((rows, ext)) = acc else {
        log::debug!(
            "no target band within {:.0}px above the grid",
            tp.max_distance * spacing
        );
        return None;
    };
    let profile = projector.columns(rows.start, rows.end);
    let pitch = ext.width() as f32 / TARGET_CELLS as f32;
    let cy = rows.center();
    let h = rows.height() as f32 * tp.height_frac;
    let w = params.cell_width_frac * pitch;
    Some(
        slot_centers(
            &profile,
            ext.x0 as f32,
            pitch,
            TARGET_CELLS,
            params.columns.refine_slots,
        )
            .into_iter()
            .map(|cx| CellBox::from_center(cx, cy, w, h))
            .collect(),
    )
}
