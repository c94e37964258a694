//! Grid Detector: finds the 8x10 cell grid and the 4-cell target strip in a
//! frame from row and column projections alone.
//!
//! The pipeline is: adaptive threshold, row projection into text bands,
//! fragment merging, selection of the most regular run of 8 bands, column
//! extent from smoothed variance, per-slot refinement, then an upward scan
//! for the target band. A detrended raw-brightness projection serves as the
//! fallback strategy.
//!
//! "Not found" is an ordinary outcome and is reported as `None`.

mod bands;
mod columns;
mod detector;
mod params;
mod projection;
mod target;

pub use detector::GridDetector;
pub use params::{BandParams, ColumnParams, DetectorParams, DetrendParams, TargetParams};
pub use projection::Strategy;
