//! Synthetic reference samples for every glyph of every alphabet.

use glyphgrid_core::{BinarySample, GrayImage, NormalizedSample, PixelRect, SAMPLE_SIZE};

use crate::alphabet::Alphabet;
use crate::cell::{normalize_region, CellParams};
use crate::render::render_glyph;

/// Scale at which template glyphs are rasterized.
pub const TEMPLATE_SCALE: usize = 8;

/// Normalized reference for one glyph.
#[derive(Clone, Debug)]
pub struct GlyphTemplate {
    pub ch: char,
    pub pixels: NormalizedSample,
    pub binary: BinarySample,
}

/// Templates for all alphabets, built up front and read-only afterwards.
///
/// The library is plain owned data: share it by reference (it is `Sync`)
/// and call [`TemplateLibrary::regenerate`] after changing cell parameters.
#[derive(Clone, Debug)]
pub struct TemplateLibrary {
    params: CellParams,
    sets: Vec<Vec<GlyphTemplate>>,
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::new(CellParams::default())
    }
}

impl TemplateLibrary {
    pub fn new(params: CellParams) -> Self {
        let sets = Alphabet::ALL
            .iter()
            .map(|&a| build_templates(a, &params))
            .collect();
        Self { params, sets }
    }

    pub fn params(&self) -> &CellParams {
        &self.params
    }

    /// Templates of `alphabet`, in alphabet order.
    pub fn templates(&self, alphabet: Alphabet) -> &[GlyphTemplate] {
        &self.sets[alphabet.index()]
    }

    /// Rebuild every template set. Repeating the call yields the same library.
    pub fn regenerate(&mut self, params: CellParams) {
        log::debug!("regenerating template library");
        *self = Self::new(params);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Alphabet, &[GlyphTemplate])> {
        Alphabet::ALL
            .into_iter()
            .map(move |a| (a, self.templates(a)))
    }

    /// All templates of `alphabet` tiled `columns` per row with a 2 px gap.
    pub fn contact_sheet(&self, alphabet: Alphabet, columns: usize) -> GrayImage {
        const GAP: usize = 2;
        let templates = self.templates(alphabet);
        let columns = columns.clamp(1, templates.len().max(1));
        let rows = templates.len().div_ceil(columns);
        let pitch = SAMPLE_SIZE + GAP;
        let mut sheet = GrayImage::new(columns * pitch + GAP, rows * pitch + GAP);
        for (i, t) in templates.iter().enumerate() {
            let (ox, oy) = (GAP + (i % columns) * pitch, GAP + (i / columns) * pitch);
            for y in 0..SAMPLE_SIZE {
                for x in 0..SAMPLE_SIZE {
                    sheet.set(ox + x, oy + y, t.pixels.get(x, y));
                }
            }
        }
        sheet
    }
}

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(params))
)]
fn build_templates(alphabet: Alphabet, params: &CellParams) -> Vec<GlyphTemplate> {
    let style = alphabet.style();
    alphabet
        .glyphs()
        .iter()
        .map(|glyph| {
            let canvas = render_glyph(glyph, style, TEMPLATE_SCALE);
            let pixels = normalize_region(
                &canvas.view(),
                PixelRect::full(canvas.width, canvas.height),
                params,
            );
            let binary = pixels.binarize();
            GlyphTemplate {
                ch: glyph.ch,
                pixels,
                binary,
            }
        })
        .collect()
}
