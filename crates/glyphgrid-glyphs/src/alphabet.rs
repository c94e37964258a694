use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builtins;

/// How a glyph bitmap is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphStyle {
    /// 5x7 bitmap, one square block per set bit.
    Block,
    /// 2x3 cell pattern, a filled disc per set bit and a ring otherwise.
    Dots,
}

/// Embedded glyph bitmap. Row masks are MSB-left, `width` bits wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub ch: char,
    pub width: usize,
    pub rows: &'static [u8],
}

impl GlyphBitmap {
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        (self.rows[row] >> (self.width - 1 - col)) & 1 == 1
    }
}

/// The closed set of supported character alphabets.
///
/// Declaration order is significant: charset detection breaks ties in
/// favour of the earlier variant.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    Digits,
    Latin,
    LatinDigits,
    Greek,
    Dots,
    Runes,
}

impl Alphabet {
    pub const ALL: [Alphabet; 6] = [
        Alphabet::Digits,
        Alphabet::Latin,
        Alphabet::LatinDigits,
        Alphabet::Greek,
        Alphabet::Dots,
        Alphabet::Runes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Alphabet::Digits => "digits",
            Alphabet::Latin => "latin",
            Alphabet::LatinDigits => "latin_digits",
            Alphabet::Greek => "greek",
            Alphabet::Dots => "dots",
            Alphabet::Runes => "runes",
        }
    }

    pub fn glyphs(self) -> &'static [GlyphBitmap] {
        match self {
            Alphabet::Digits => builtins::DIGITS,
            Alphabet::Latin => builtins::LATIN,
            Alphabet::LatinDigits => builtins::LATIN_DIGITS,
            Alphabet::Greek => builtins::GREEK,
            Alphabet::Dots => builtins::DOTS,
            Alphabet::Runes => builtins::RUNES,
        }
    }

    pub fn style(self) -> GlyphStyle {
        match self {
            Alphabet::Dots => GlyphStyle::Dots,
            _ => GlyphStyle::Block,
        }
    }

    pub fn glyph(self, ch: char) -> Option<&'static GlyphBitmap> {
        self.glyphs().iter().find(|g| g.ch == ch)
    }

    pub fn contains(self, ch: char) -> bool {
        self.glyph(ch).is_some()
    }

    pub fn chars(self) -> impl Iterator<Item = char> {
        self.glyphs().iter().map(|g| g.ch)
    }

    /// Position in [`Alphabet::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown alphabet {0:?} (expected one of digits, latin, latin_digits, greek, dots, runes)")]
pub struct UnknownAlphabet(pub String);

impl FromStr for Alphabet {
    type Err = UnknownAlphabet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Alphabet::ALL
            .into_iter()
            .find(|a| a.name() == key)
            .ok_or_else(|| UnknownAlphabet(s.to_string()))
    }
}
