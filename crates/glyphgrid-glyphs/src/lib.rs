//! Glyph alphabets and template-based glyph identification.
//!
//! This crate covers:
//! - six embedded alphabets (compiled into the binary from `data/glyphs.json`),
//! - the Cell Processor that turns a cell crop into a 32x32 normalized sample,
//! - the template library built from the same normalization,
//! - nearest-template glyph reading and charset auto-detection,
//! - a synthetic board renderer for tests and demos.
//!
//! Grid localization lives in `glyphgrid-detect`; sequence alignment in
//! `glyphgrid-match`.

mod alphabet;
pub mod builtins;
mod cell;
mod identify;
mod library;
pub mod render;
pub mod synth;

pub use alphabet::{Alphabet, GlyphBitmap, GlyphStyle, UnknownAlphabet};
pub use cell::{extract_cell, extract_cell_gray, normalize_region, split_halves, CellParams};
pub use identify::{
    detect_charset, identify_char, identify_code, rank_charsets, CharsetScore, GlyphMatch,
    IdentifyParams,
};
pub use glyphgrid_core::UNREADABLE_CODE;
pub use library::{GlyphTemplate, TemplateLibrary, TEMPLATE_SCALE};
