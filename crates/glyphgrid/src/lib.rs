//! Find where a 4-code target strip sits inside an 8x10 glyph grid.
//!
//! This facade ties the workspace crates into one pipeline:
//!
//! 1. [`detect`]: locate the grid rows, columns and the target strip;
//! 2. [`glyphs`]: normalize each cell to a 32x32 sample and read it against
//!    the embedded alphabet templates (or detect the alphabet first);
//! 3. [`matching`]: align the target against the grid, by code text or by
//!    pixels, with wraparound.
//!
//! ## Quickstart
//!
//! ```no_run
//! use glyphgrid::{Scanner, ScanStatus};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = glyphgrid::image::load_frame("board.png")?;
//! let report = Scanner::default().scan(&frame);
//! if report.status == ScanStatus::Matched {
//!     let m = report.match_result.unwrap();
//!     println!("target at row {}, col {}", m.row, m.col);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `glyphgrid::core`: frames, grayscale and binary images, samples, layout.
//! - `glyphgrid::detect`: the grid and target strip detector.
//! - `glyphgrid::glyphs`: alphabets, cell normalization, template reading,
//!   synthetic boards.
//! - `glyphgrid::matching`: text and pixel sequence alignment.
//! - `glyphgrid::image` (feature `image`): `image` crate conversions.
//!
//! Every "not found" outcome is a [`ScanStatus`], never an error.

pub use glyphgrid_core as core;
pub use glyphgrid_detect as detect;
pub use glyphgrid_glyphs as glyphs;
pub use glyphgrid_match as matching;

pub use glyphgrid_core::{CellBox, GridInfo, ImageFrame, NormalizedSample};
pub use glyphgrid_glyphs::{Alphabet, TemplateLibrary};
pub use glyphgrid_match::MatchResult;

mod error;
mod io;
mod params;
mod reader;
mod scanner;
mod tracker;

#[cfg(feature = "image")]
pub mod image;

pub use error::{ConfigError, ScanError};
pub use io::ScanConfig;
pub use params::{ReadMode, ScanParams};
pub use reader::{CodeReader, TemplateReader};
pub use scanner::{ScanReport, ScanStatus, Scanner};
pub use tracker::Tracker;
