//! Nearest-template glyph classification and charset detection.

use glyphgrid_core::{BinarySample, NormalizedSample, UNREADABLE_CODE};
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::cell::{split_halves, CellParams};
use crate::library::{GlyphTemplate, TemplateLibrary};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifyParams {
    /// Best-template distance above which a glyph is unreadable.
    ///
    /// Reads of the expected alphabet stay under 0.15; most glyphs of
    /// another alphabet land above 0.2.
    pub max_distance: f32,
}

impl Default for IdentifyParams {
    fn default() -> Self {
        Self { max_distance: 0.2 }
    }
}

/// Best template for a sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMatch {
    pub ch: char,
    /// Fraction of mismatched pixels, in `[0, 1]`.
    pub distance: f32,
    /// Distance to the runner-up template (`1.0` with a single template).
    pub second: f32,
}

impl GlyphMatch {
    /// Gap between the runner-up and the best template.
    pub fn margin(&self) -> f32 {
        self.second - self.distance
    }
}

fn best_two(binary: &BinarySample, templates: &[GlyphTemplate]) -> Option<GlyphMatch> {
    let mut best: Option<GlyphMatch> = None;
    for t in templates {
        let d = binary.hamming_fraction(&t.binary);
        match best.as_mut() {
            None => {
                best = Some(GlyphMatch {
                    ch: t.ch,
                    distance: d,
                    second: 1.0,
                })
            }
            Some(m) if d < m.distance => {
                m.second = m.distance;
                m.distance = d;
                m.ch = t.ch;
            }
            Some(m) if d < m.second => m.second = d,
            Some(_) => {}
        }
    }
    best
}

/// Classify one glyph sample by minimum Hamming distance.
///
/// Returns `None` only when `templates` is empty.
pub fn identify_char(sample: &NormalizedSample, templates: &[GlyphTemplate]) -> Option<GlyphMatch> {
    best_two(&sample.binarize(), templates)
}

/// Read a two-glyph cell sample.
///
/// Blank halves, or halves whose best distance exceeds
/// `params.max_distance`, make the whole code [`UNREADABLE_CODE`].
pub fn identify_code(
    cell: &NormalizedSample,
    templates: &[GlyphTemplate],
    cell_params: &CellParams,
    params: &IdentifyParams,
) -> String {
    if cell.dynamic_range() <= cell_params.stretch_floor {
        return UNREADABLE_CODE.to_string();
    }
    let (left, right) = split_halves(cell, cell_params);
    let mut code = String::with_capacity(8);
    for half in [&left, &right] {
        if half.dynamic_range() <= cell_params.stretch_floor {
            return UNREADABLE_CODE.to_string();
        }
        match identify_char(half, templates) {
            Some(m) if m.distance <= params.max_distance => code.push(m.ch),
            _ => return UNREADABLE_CODE.to_string(),
        }
    }
    code
}

/// Average best-vs-runner-up gap of one alphabet over a set of samples.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharsetScore {
    pub alphabet: Alphabet,
    pub mean_gap: f32,
}

/// Score every alphabet against the same glyph samples, in
/// [`Alphabet::ALL`] order.
pub fn rank_charsets(halves: &[NormalizedSample], library: &TemplateLibrary) -> Vec<CharsetScore> {
    let binaries: Vec<BinarySample> = halves.iter().map(|h| h.binarize()).collect();
    Alphabet::ALL
        .iter()
        .map(|&alphabet| {
            let templates = library.templates(alphabet);
            let total: f32 = binaries
                .iter()
                .filter_map(|b| best_two(b, templates))
                .map(|m| m.margin())
                .sum();
            let mean_gap = if binaries.is_empty() {
                0.0
            } else {
                total / binaries.len() as f32
            };
            CharsetScore { alphabet, mean_gap }
        })
        .collect()
}

/// Pick the alphabet whose templates classify `halves` most decisively.
///
/// Ties go to the earlier alphabet. Returns `None` for an empty sample set
/// or when no alphabet separates the samples at all.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(n = halves.len()))
)]
pub fn detect_charset(halves: &[NormalizedSample], library: &TemplateLibrary) -> Option<Alphabet> {
    if halves.is_empty() {
        return None;
    }
    let scores = rank_charsets(halves, library);
    let mut best: Option<CharsetScore> = None;
    for s in scores {
        log::debug!("charset {}: mean gap {:.4}", s.alphabet, s.mean_gap);
        if best.is_none_or(|b| s.mean_gap > b.mean_gap) {
            best = Some(s);
        }
    }
    best.filter(|b| b.mean_gap > 0.0).map(|b| b.alphabet)
}
