//! Repeated scans over a frame stream.

use glyphgrid_core::{GridInfo, ImageFrame};
use glyphgrid_glyphs::Alphabet;

use crate::scanner::{ScanReport, Scanner};

/// Caches the geometry and alphabet of the last successful scan.
///
/// Each [`Tracker::update`] first tries the cached grid; when that no
/// longer yields an unambiguous match the cache is dropped and the frame is scanned from
/// scratch.
#[derive(Clone, Debug)]
pub struct Tracker {
    scanner: Scanner,
    grid: Option<GridInfo>,
    alphabet: Option<Alphabet>,
}

impl Tracker {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            grid: None,
            alphabet: None,
        }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn cached_grid(&self) -> Option<&GridInfo> {
        self.grid.as_ref()
    }

    pub fn cached_alphabet(&self) -> Option<Alphabet> {
        self.alphabet
    }

    /// Forget the cached geometry, e.g. after the camera moved.
    pub fn invalidate(&mut self) {
        self.grid = None;
        self.alphabet = None;
    }

    pub fn update(&mut self, frame: &ImageFrame) -> ScanReport {
        if let Some(grid) = &self.grid {
            let alphabet = self.scanner.params().alphabet.or(self.alphabet);
            let report = self.scanner.scan_grid(frame, grid, alphabet);
            if holds(&report) {
                return report;
            }
            log::debug!("cached grid lost the match, re-detecting");
            self.invalidate();
        }

        let report = self.scanner.scan(frame);
        if holds(&report) {
            self.grid = report.grid.clone();
            self.alphabet = report.alphabet;
        }
        report
    }
}

/// A match that is not a tie between positions.
fn holds(report: &ScanReport) -> bool {
    report
        .match_result
        .as_ref()
        .is_some_and(|m| m.confidence > 0.0)
}
