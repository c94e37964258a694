//! Sequence matching for glyph grids.
//!
//! A target of a few codes is aligned against the grid's row-major code
//! sequence, treating the sequence as circular. Two interchangeable modes:
//!
//! - [`find_match_by_text`]: over decoded code strings, exact first, then a
//!   fuzzy pass with per-code mismatch costs and a cost ceiling;
//! - [`find_match`]: directly over normalized samples with an ensemble of
//!   correlation and binary-shape distances.
//!
//! Both return a [`MatchResult`] with a 1-based row/column and a confidence
//! derived from the gap to the runner-up.

mod pixels;
mod result;
mod text;

pub use pixels::{
    find_match, find_match_features, sample_distance, PixelMatchParams, SampleFeatures,
};
pub use result::{columns_for_len, Candidate, MatchResult};
pub use text::{code_cost, find_match_by_text, TextMatchParams};
