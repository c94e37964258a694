//! Horizontal text bands and the regular run that forms the grid rows.

use crate::params::BandParams;
use crate::projection::Profile;

/// Contiguous rows of ink, `start..=end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Band {
    pub start: usize,
    pub end: usize,
    /// Mean profile value over the band.
    pub density: f32,
}

impl Band {
    #[inline]
    pub fn height(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline]
    pub fn center(&self) -> f32 {
        (self.start + self.end) as f32 * 0.5
    }
}

/// Runs of ink rows at least `min_rows` tall.
pub(crate) fn find_bands(profile: &Profile, min_rows: usize) -> Vec<Band> {
    let mut bands = Vec::new();
    let mut start: Option<usize> = None;
    let n = profile.values.len();
    for y in 0..=n {
        let ink = y < n && profile.is_ink(y);
        match (ink, start) {
            (true, None) => start = Some(y),
            (false, Some(s)) => {
                if y - s >= min_rows {
                    let sum: f32 = profile.values[s..y].iter().sum();
                    bands.push(Band {
                        start: s,
                        end: y - 1,
                        density: sum / (y - s) as f32,
                    });
                }
                start = None;
            }
            _ => {}
        }
    }
    bands
}

/// Candidate gap thresholds separating within-glyph splits from row
/// spacing, most convincing first.
///
/// Every ratio jump in the sorted gap list yields a split at the geometric
/// mean of the two gaps around it, strongest jump first. A fraction of the
/// median gap comes last.
fn merge_thresholds(gaps: &[usize], params: &BandParams) -> Vec<f32> {
    let mut sorted = gaps.to_vec();
    sorted.sort_unstable();
    let mut jumps: Vec<(f32, f32)> = sorted
        .windows(2)
        .filter_map(|pair| {
            let lo = pair[0].max(1) as f32;
            let ratio = pair[1] as f32 / lo;
            (ratio >= params.merge_jump_ratio).then(|| (ratio, (lo * pair[1] as f32).sqrt()))
        })
        .collect();
    jumps.sort_by(|a, b| b.0.total_cmp(&a.0));
    let mut thresholds: Vec<f32> = jumps.into_iter().map(|(_, t)| t).collect();
    thresholds.push(sorted[sorted.len() / 2] as f32 * params.merge_median_frac);
    thresholds
}

fn merge_below(bands: &[Band], gaps: &[usize], threshold: f32) -> Vec<Band> {
    let mut merged = vec![bands[0]];
    for (band, &gap) in bands[1..].iter().zip(gaps) {
        let last = merged.len() - 1;
        if (gap as f32) < threshold {
            let m = &mut merged[last];
            let (h0, h1) = (m.height() as f32, band.height() as f32);
            m.density = (m.density * h0 + band.density * h1) / (h0 + h1);
            m.end = band.end;
        } else {
            merged.push(*band);
        }
    }
    merged
}

/// Join bands split by gaps inside glyphs (e.g. the holes of dotted glyphs).
///
/// The first candidate threshold that leaves at least `min_bands` bands
/// wins. A tall gap above the grid can outrank the row spacing, so a merge
/// that swallows the rows is skipped rather than kept. Without any usable
/// threshold the bands are returned unmerged.
pub(crate) fn merge_fragments(
    bands: Vec<Band>,
    params: &BandParams,
    min_bands: usize,
) -> Vec<Band> {
    if bands.len() < 2 {
        return bands;
    }
    let gaps: Vec<usize> = bands
        .windows(2)
        .map(|w| w[1].start - w[0].end - 1)
        .collect();
    for threshold in merge_thresholds(&gaps, params) {
        let merged = merge_below(&bands, &gaps, threshold);
        log::trace!(
            "band merge: {} -> {} (threshold {:.1})",
            bands.len(),
            merged.len(),
            threshold
        );
        if merged.len() >= min_bands {
            return merged;
        }
    }
    bands
}

/// `rows` consecutive bands with the most regular spacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RowRun {
    pub first: usize,
    pub spacing: f32,
    pub spacing_cv: f32,
    pub density: f32,
}

/// Pick the run of `rows` bands whose center spacing has the lowest
/// coefficient of variation; near-ties go to the denser run.
pub(crate) fn select_regular_run(
    bands: &[Band],
    rows: usize,
    params: &BandParams,
) -> Option<RowRun> {
    if rows < 2 || bands.len() < rows {
        return None;
    }
    let mut best: Option<RowRun> = None;
    for first in 0..=bands.len() - rows {
        let run = &bands[first..first + rows];
        let deltas: Vec<f32> = run
            .windows(2)
            .map(|w| w[1].center() - w[0].center())
            .collect();
        let mean = deltas.iter().sum::<f32>() / deltas.len() as f32;
        if mean <= 0.0 {
            continue;
        }
        let var = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f32>() / deltas.len() as f32;
        let cv = var.sqrt() / mean;
        let density = run.iter().map(|b| b.density).sum::<f32>() / rows as f32;
        let candidate = RowRun {
            first,
            spacing: mean,
            spacing_cv: cv,
            density,
        };
        best = match best {
            None => Some(candidate),
            Some(b) if cv < b.spacing_cv - 1e-3 => Some(candidate),
            Some(b) if (cv - b.spacing_cv).abs() <= 1e-3 && density > b.density => Some(candidate),
            keep => keep,
        };
    }
    let run = best?;
    log::debug!(
        "row run at band {}: spacing {:.1}, cv {:.3}, density {:.3}",
        run.first,
        run.spacing,
        run.spacing_cv,
        run.density
    );
    if run.spacing_cv > params.max_spacing_cv || run.density < params.min_run_density {
        return None;
    }
    Some(run)
}
