//! Single-shot scan: detect, normalize, read, align.

use std::sync::Arc;

use glyphgrid_core::{CellBox, GridInfo, ImageFrame, NormalizedSample};
use glyphgrid_detect::GridDetector;
use glyphgrid_glyphs::{detect_charset, extract_cell, split_halves, Alphabet, TemplateLibrary};
use glyphgrid_match::{find_match, find_match_by_text, MatchResult};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::params::{ReadMode, ScanParams};
use crate::reader::{CodeReader, TemplateReader};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Outcome of one scan. Everything except `Matched` is an expected,
/// retryable condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Matched,
    GridNotFound,
    TargetNotFound,
    CharsetUndetermined,
    NoMatch,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ScanStatus::Matched => "matched",
            ScanStatus::GridNotFound => "grid not found",
            ScanStatus::TargetNotFound => "target not found",
            ScanStatus::CharsetUndetermined => "charset undetermined",
            ScanStatus::NoMatch => "no match",
        })
    }
}

/// Everything one scan found, as far as it got.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub status: ScanStatus,
    pub mode: ReadMode,
    #[serde(default)]
    pub alphabet: Option<Alphabet>,
    #[serde(default)]
    pub grid: Option<GridInfo>,
    /// Row-major grid codes (text mode only).
    #[serde(default)]
    pub grid_codes: Vec<String>,
    #[serde(default)]
    pub target_codes: Vec<String>,
    #[serde(default)]
    pub match_result: Option<MatchResult>,
}

impl ScanReport {
    fn empty(status: ScanStatus, mode: ReadMode) -> Self {
        Self {
            status,
            mode,
            alphabet: None,
            grid: None,
            grid_codes: Vec::new(),
            target_codes: Vec::new(),
            match_result: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == ScanStatus::Matched
    }
}

/// The full pipeline with its parameters and template library.
///
/// The library is shared through an `Arc`; cloning a scanner or building
/// several from one library does not rebuild templates.
#[derive(Clone, Debug)]
pub struct Scanner {
    params: ScanParams,
    detector: GridDetector,
    library: Arc<TemplateLibrary>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanParams::default())
    }
}

impl Scanner {
    pub fn new(params: ScanParams) -> Self {
        let library = Arc::new(TemplateLibrary::new(params.cell.clone()));
        Self::with_library(params, library)
    }

    /// Reuse an existing library; it is regenerated if it was built with
    /// different cell parameters.
    pub fn with_library(params: ScanParams, mut library: Arc<TemplateLibrary>) -> Self {
        if library.params() != &params.cell {
            log::debug!("template library built with other cell params");
            Arc::make_mut(&mut library).regenerate(params.cell.clone());
        }
        Self {
            detector: GridDetector::new(params.detector.clone()),
            params,
            library,
        }
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    pub fn detector(&self) -> &GridDetector {
        &self.detector
    }

    pub fn library(&self) -> &Arc<TemplateLibrary> {
        &self.library
    }

    /// Detect the grid and run the configured read mode.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "info",
            skip_all,
            fields(w = frame.width(), h = frame.height())
        )
    )]
    pub fn scan(&self, frame: &ImageFrame) -> ScanReport {
        match self.detector.detect(frame) {
            Some(grid) => self.scan_with_grid(frame, &grid),
            None => {
                log::info!("no grid found");
                ScanReport::empty(ScanStatus::GridNotFound, self.params.mode)
            }
        }
    }

    /// [`Scanner::scan`] over a raw RGBA buffer.
    pub fn scan_rgba(
        &self,
        width: usize,
        height: usize,
        data: Vec<u8>,
    ) -> Result<ScanReport, ScanError> {
        let frame = ImageFrame::new(width, height, data)?;
        Ok(self.scan(&frame))
    }

    /// Scan with geometry from an earlier detection.
    pub fn scan_with_grid(&self, frame: &ImageFrame, grid: &GridInfo) -> ScanReport {
        self.scan_grid(frame, grid, self.params.alphabet)
    }

    /// Detect the grid, read every cell with `reader` and align the codes
    /// in text mode.
    pub fn scan_with_reader(&self, frame: &ImageFrame, reader: &dyn CodeReader) -> ScanReport {
        let Some(grid) = self.detector.detect(frame) else {
            return ScanReport::empty(ScanStatus::GridNotFound, ReadMode::Text);
        };
        let mut report = ScanReport::empty(ScanStatus::TargetNotFound, ReadMode::Text);
        if let Some(target_cells) = &grid.target_cells {
            report.grid_codes = reader.read_codes(frame, &grid.grid_cells);
            report.target_codes = reader.read_codes(frame, target_cells);
            report.match_result =
                find_match_by_text(&report.target_codes, &report.grid_codes, &self.params.text);
            report.status = match_status(&report.match_result);
        }
        report.grid = Some(grid);
        report
    }

    pub(crate) fn scan_grid(
        &self,
        frame: &ImageFrame,
        grid: &GridInfo,
        alphabet: Option<Alphabet>,
    ) -> ScanReport {
        let mode = self.params.mode;
        let mut report = ScanReport::empty(ScanStatus::TargetNotFound, mode);
        report.grid = Some(grid.clone());
        let Some(target_cells) = grid.target_cells.as_deref() else {
            log::info!("grid found, target strip missing");
            return report;
        };

        let grid_samples = self.extract_samples(frame, &grid.grid_cells);
        let target_samples = self.extract_samples(frame, target_cells);

        let result = match mode {
            ReadMode::Pixels => find_match(&target_samples, &grid_samples, &self.params.pixels),
            ReadMode::Text => {
                let Some(alphabet) = alphabet.or_else(|| self.detect_alphabet(&grid_samples)) else {
                    log::info!("charset undetermined");
                    report.status = ScanStatus::CharsetUndetermined;
                    return report;
                };
                report.alphabet = Some(alphabet);
                let reader = TemplateReader::new(
                    &self.library,
                    alphabet,
                    &self.params.cell,
                    &self.params.identify,
                );
                report.grid_codes = read_samples(&reader, &grid_samples);
                report.target_codes = read_samples(&reader, &target_samples);
                find_match_by_text(&report.target_codes, &report.grid_codes, &self.params.text)
            }
        };
        report.status = match_status(&result);
        match &result {
            Some(m) => log::info!(
                "match at row {} col {} (score {:.2}, confidence {:.2})",
                m.row,
                m.col,
                m.score,
                m.confidence
            ),
            None => log::info!("no position matched the target"),
        }
        report.match_result = result;
        report
    }

    /// Charset whose templates read the non-blank grid cells most decisively.
    pub fn detect_alphabet(&self, samples: &[NormalizedSample]) -> Option<Alphabet> {
        let floor = self.params.cell.stretch_floor;
        let halves: Vec<NormalizedSample> = samples
            .iter()
            .filter(|s| s.dynamic_range() > floor)
            .flat_map(|s| {
                let (left, right) = split_halves(s, &self.params.cell);
                [left, right]
            })
            .collect();
        detect_charset(&halves, &self.library)
    }

    /// Normalize every cell; cells clipped below the minimum crop come back
    /// blank.
    pub fn extract_samples(&self, frame: &ImageFrame, cells: &[CellBox]) -> Vec<NormalizedSample> {
        let extract = |c: &CellBox| {
            extract_cell(frame, c, &self.params.cell).unwrap_or_else(NormalizedSample::blank)
        };
        #[cfg(feature = "rayon")]
        {
            cells.par_iter().map(extract).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            cells.iter().map(extract).collect()
        }
    }
}

fn read_samples(reader: &TemplateReader<'_>, samples: &[NormalizedSample]) -> Vec<String> {
    #[cfg(feature = "rayon")]
    {
        samples.par_iter().map(|s| reader.read_sample(s)).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        samples.iter().map(|s| reader.read_sample(s)).collect()
    }
}

fn match_status(result: &Option<MatchResult>) -> ScanStatus {
    if result.is_some() {
        ScanStatus::Matched
    } else {
        ScanStatus::NoMatch
    }
}
