//! Embedded glyph bitmaps, one table per alphabet.
//!
//! The source-of-truth lives in `glyphgrid-glyphs/data/glyphs.json`.

#![allow(clippy::unreadable_literal)]

use crate::alphabet::GlyphBitmap;

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));
