use glyphgrid_detect::DetectorParams;
use glyphgrid_glyphs::{Alphabet, CellParams, IdentifyParams};
use glyphgrid_match::{PixelMatchParams, TextMatchParams};
use serde::{Deserialize, Serialize};

/// How cells are compared against the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Decode every cell to a code string, then align the strings.
    #[default]
    Text,
    /// Align normalized samples directly, without decoding.
    Pixels,
}

/// Every tunable of the scan pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    pub detector: DetectorParams,
    pub cell: CellParams,
    pub identify: IdentifyParams,
    pub text: TextMatchParams,
    pub pixels: PixelMatchParams,
    pub mode: ReadMode,
    /// Skip charset detection and read with this alphabet.
    pub alphabet: Option<Alphabet>,
}
