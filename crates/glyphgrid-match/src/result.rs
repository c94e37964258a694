use serde::{Deserialize, Serialize};

/// A scored alignment start position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub position: usize,
    pub score: f32,
}

/// Best alignment of a target sequence inside a grid sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Grid index aligned with the first target code.
    pub position: usize,
    /// 1-based row of `position`.
    pub row: usize,
    /// 1-based column of `position`.
    pub col: usize,
    /// Column count used for the row/column split.
    pub cols: usize,
    /// Alignment cost; `0` is an exact match.
    pub score: f32,
    /// Normalized gap to the runner-up, in `[0, 1]`.
    pub confidence: f32,
    /// Runner-up positions, best first.
    #[serde(default)]
    pub alternatives: Vec<Candidate>,
}

impl MatchResult {
    pub(crate) fn new(position: usize, grid_len: usize, score: f32, confidence: f32) -> Self {
        let cols = columns_for_len(grid_len);
        Self {
            position,
            row: position / cols + 1,
            col: position % cols + 1,
            cols,
            score,
            confidence,
            alternatives: Vec::new(),
        }
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.score == 0.0
    }
}

/// Column count of a grid holding `len` codes.
///
/// 80 codes are the standard 10-column layout; other lengths use their
/// largest divisor in `7..=10`, else 10.
pub fn columns_for_len(len: usize) -> usize {
    if len == 80 {
        return 10;
    }
    (7..=10).rev().find(|d| len % d == 0).unwrap_or(10)
}
