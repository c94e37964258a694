//! Per-cell code readers.

use glyphgrid_core::{CellBox, ImageFrame, NormalizedSample};
use glyphgrid_glyphs::{
    extract_cell, identify_code, Alphabet, CellParams, IdentifyParams, TemplateLibrary,
    UNREADABLE_CODE,
};

/// Turns cell boxes into code strings.
///
/// The built-in [`TemplateReader`] covers every alphabet. An external OCR
/// engine can implement this trait and be passed to
/// [`Scanner::scan_with_reader`](crate::Scanner::scan_with_reader); its
/// output goes through the same text matcher. Cells that cannot be read
/// should come back as [`UNREADABLE_CODE`].
pub trait CodeReader {
    fn read_code(&self, frame: &ImageFrame, cell: &CellBox) -> String;

    fn read_codes(&self, frame: &ImageFrame, cells: &[CellBox]) -> Vec<String> {
        cells.iter().map(|c| self.read_code(frame, c)).collect()
    }
}

/// Nearest-template reader for one alphabet.
#[derive(Clone, Copy, Debug)]
pub struct TemplateReader<'a> {
    library: &'a TemplateLibrary,
    alphabet: Alphabet,
    cell: &'a CellParams,
    identify: &'a IdentifyParams,
}

impl<'a> TemplateReader<'a> {
    pub fn new(
        library: &'a TemplateLibrary,
        alphabet: Alphabet,
        cell: &'a CellParams,
        identify: &'a IdentifyParams,
    ) -> Self {
        Self {
            library,
            alphabet,
            cell,
            identify,
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Read an already normalized cell.
    pub fn read_sample(&self, sample: &NormalizedSample) -> String {
        identify_code(
            sample,
            self.library.templates(self.alphabet),
            self.cell,
            self.identify,
        )
    }
}

impl CodeReader for TemplateReader<'_> {
    fn read_code(&self, frame: &ImageFrame, cell: &CellBox) -> String {
        match extract_cell(frame, cell, self.cell) {
            Some(sample) => self.read_sample(&sample),
            None => UNREADABLE_CODE.to_string(),
        }
    }
}
