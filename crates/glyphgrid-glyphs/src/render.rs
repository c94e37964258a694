//! Rasterize glyph bitmaps into grayscale canvases.
//!
//! Ink is drawn bright on a dark canvas. Block glyphs use one `scale x scale`
//! square per set bit. Dot glyphs place discs of radius `scale` on a
//! `3 * scale` pitch, with 4x4 supersampled coverage for smooth edges.

use glyphgrid_core::GrayImage;

use crate::alphabet::{GlyphBitmap, GlyphStyle};

const SUPERSAMPLE: usize = 4;
const RING_THICKNESS: f32 = 0.25;

/// Pixel size `(width, height)` of one glyph at `scale`.
pub fn glyph_size(style: GlyphStyle, scale: usize) -> (usize, usize) {
    match style {
        GlyphStyle::Block => (5 * scale, 7 * scale),
        GlyphStyle::Dots => (5 * scale, 8 * scale),
    }
}

/// Pixel size of a two-glyph code: two glyphs separated by `scale`.
pub fn code_size(style: GlyphStyle, scale: usize) -> (usize, usize) {
    let (gw, gh) = glyph_size(style, scale);
    (2 * gw + scale, gh)
}

/// Draw `glyph` with its top-left corner at `(ox, oy)`. Pixels falling
/// outside the canvas are skipped; overlapping ink keeps the brighter value.
pub fn draw_glyph(
    img: &mut GrayImage,
    ox: i64,
    oy: i64,
    glyph: &GlyphBitmap,
    style: GlyphStyle,
    scale: usize,
    ink: u8,
) {
    match style {
        GlyphStyle::Block => draw_blocks(img, ox, oy, glyph, scale, ink),
        GlyphStyle::Dots => draw_dots(img, ox, oy, glyph, scale, ink),
    }
}

fn put_max(img: &mut GrayImage, x: i64, y: i64, v: u8) {
    if x < 0 || y < 0 || x >= img.width as i64 || y >= img.height as i64 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if v > img.get(x, y) {
        img.set(x, y, v);
    }
}

fn draw_blocks(img: &mut GrayImage, ox: i64, oy: i64, glyph: &GlyphBitmap, scale: usize, ink: u8) {
    let s = scale as i64;
    for row in 0..glyph.height() {
        for col in 0..glyph.width {
            if !glyph.is_set(col, row) {
                continue;
            }
            let x0 = ox + col as i64 * s;
            let y0 = oy + row as i64 * s;
            for y in y0..y0 + s {
                for x in x0..x0 + s {
                    put_max(img, x, y, ink);
                }
            }
        }
    }
}

fn draw_dots(img: &mut GrayImage, ox: i64, oy: i64, glyph: &GlyphBitmap, scale: usize, ink: u8) {
    let radius = scale as f32;
    let pitch = 3.0 * scale as f32;
    let inner = radius - RING_THICKNESS * scale as f32;
    let ss = SUPERSAMPLE as f32;

    for row in 0..glyph.height() {
        for col in 0..glyph.width {
            let filled = glyph.is_set(col, row);
            let cx = ox as f32 + radius + col as f32 * pitch;
            let cy = oy as f32 + radius + row as f32 * pitch;
            let (x_lo, x_hi) = ((cx - radius) as i64 - 1, (cx + radius) as i64 + 1);
            let (y_lo, y_hi) = ((cy - radius) as i64 - 1, (cy + radius) as i64 + 1);
            for y in y_lo..=y_hi {
                for x in x_lo..=x_hi {
                    let mut hits = 0usize;
                    for b in 0..SUPERSAMPLE {
                        for a in 0..SUPERSAMPLE {
                            let dx = x as f32 + (a as f32 + 0.5) / ss - cx;
                            let dy = y as f32 + (b as f32 + 0.5) / ss - cy;
                            let d = dx.hypot(dy);
                            if d <= radius && (filled || d >= inner) {
                                hits += 1;
                            }
                        }
                    }
                    if hits > 0 {
                        let v = (ink as f32 * hits as f32 / (ss * ss)).round() as u8;
                        put_max(img, x, y, v);
                    }
                }
            }
        }
    }
}

/// Draw a sequence of glyphs left to right, `scale` pixels apart.
pub fn draw_code(
    img: &mut GrayImage,
    ox: i64,
    oy: i64,
    glyphs: &[&GlyphBitmap],
    style: GlyphStyle,
    scale: usize,
    ink: u8,
) {
    let (gw, _) = glyph_size(style, scale);
    for (i, glyph) in glyphs.iter().enumerate() {
        let x = ox + (i * (gw + scale)) as i64;
        draw_glyph(img, x, oy, glyph, style, scale, ink);
    }
}

/// Render one glyph alone on a black canvas with a `2 * scale` margin.
pub fn render_glyph(glyph: &GlyphBitmap, style: GlyphStyle, scale: usize) -> GrayImage {
    let (gw, gh) = glyph_size(style, scale);
    let margin = 2 * scale;
    let mut img = GrayImage::new(gw + 2 * margin, gh + 2 * margin);
    let m = margin as i64;
    draw_glyph(&mut img, m, m, glyph, style, scale, 255);
    img
}
