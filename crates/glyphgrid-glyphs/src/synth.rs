//! Synthetic board renderer: an 8x10 grid of codes under a 4-code target
//! strip, with optional sensor noise and a lighting gradient.
//!
//! Boards come with their ground-truth cell boxes, which makes them the
//! fixture of choice for detector and end-to-end tests.

use glyphgrid_core::{CellBox, GrayImage, ImageFrame, GRID_COLS, GRID_ROWS, TARGET_CELLS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alphabet::{Alphabet, GlyphBitmap};
use crate::render::{code_size, draw_code};

/// Deterministic xorshift64 generator for reproducible boards.
#[derive(Clone, Debug)]
pub struct XorShift64(u64);

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self(if seed == 0 { 1 } else { seed })
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish integer in `0..n`.
    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// `count` random two-glyph codes over `alphabet`.
pub fn random_codes(alphabet: Alphabet, count: usize, rng: &mut XorShift64) -> Vec<String> {
    let glyphs = alphabet.glyphs();
    let n = glyphs.len() as u64;
    (0..count)
        .map(|_| {
            let a = glyphs[rng.below(n) as usize].ch;
            let b = glyphs[rng.below(n) as usize].ch;
            [a, b].iter().collect()
        })
        .collect()
}

/// The target strip cut from `grid` at `position`, wrapping around the end.
pub fn target_at(grid: &[String], position: usize) -> Vec<String> {
    (0..TARGET_CELLS)
        .map(|i| grid[(position + i) % grid.len()].clone())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSpec {
    /// Minimum frame size; grown to fit the board.
    pub width: usize,
    pub height: usize,
    /// Glyph scale of grid codes.
    pub scale: usize,
    /// Glyph scale of the target strip.
    pub target_scale: usize,
    pub background: u8,
    pub ink: u8,
    /// Uniform noise amplitude, in gray levels.
    pub noise: u8,
    /// Background brightening from the left to the right edge.
    pub gradient: f32,
    pub seed: u64,
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            scale: 3,
            target_scale: 4,
            background: 20,
            ink: 220,
            noise: 0,
            gradient: 0.0,
            seed: 7,
        }
    }
}

impl BoardSpec {
    /// Defaults suited to `alphabet`: dot glyphs need one step more scale.
    pub fn for_alphabet(alphabet: Alphabet) -> Self {
        let mut spec = Self::default();
        if alphabet == Alphabet::Dots {
            spec.scale = 4;
            spec.target_scale = 5;
        }
        spec
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthError {
    #[error("expected {expected} codes, got {got}")]
    CodeCount { expected: usize, got: usize },
    #[error("code {code:?} must be two glyphs of {alphabet}")]
    BadCode { code: String, alphabet: Alphabet },
    #[error("glyph scale must be positive")]
    ZeroScale,
}

/// Rendered board with the ground-truth boxes of every code.
#[derive(Clone, Debug)]
pub struct SyntheticBoard {
    pub frame: ImageFrame,
    pub grid_cells: Vec<CellBox>,
    pub target_cells: Vec<CellBox>,
}

fn code_glyphs(code: &str, alphabet: Alphabet) -> Result<Vec<&'static GlyphBitmap>, SynthError> {
    let glyphs: Option<Vec<_>> = code.chars().map(|c| alphabet.glyph(c)).collect();
    match glyphs {
        Some(g) if g.len() == 2 => Ok(g),
        _ => Err(SynthError::BadCode {
            code: code.to_string(),
            alphabet,
        }),
    }
}

/// Render `grid` (80 codes, row-major) and `target` (4 codes).
pub fn render_board(
    alphabet: Alphabet,
    grid: &[String],
    target: &[String],
    spec: &BoardSpec,
) -> Result<SyntheticBoard, SynthError> {
    let cells = GRID_ROWS * GRID_COLS;
    if grid.len() != cells {
        return Err(SynthError::CodeCount {
            expected: cells,
            got: grid.len(),
        });
    }
    if target.len() != TARGET_CELLS {
        return Err(SynthError::CodeCount {
            expected: TARGET_CELLS,
            got: target.len(),
        });
    }
    if spec.scale == 0 || spec.target_scale == 0 {
        return Err(SynthError::ZeroScale);
    }
    let grid_glyphs = grid
        .iter()
        .map(|c| code_glyphs(c, alphabet))
        .collect::<Result<Vec<_>, _>>()?;
    let target_glyphs = target
        .iter()
        .map(|c| code_glyphs(c, alphabet))
        .collect::<Result<Vec<_>, _>>()?;

    let style = alphabet.style();
    let s = spec.scale;
    let (cw, ch) = code_size(style, s);
    let pitch_x = cw + 6 * s;
    let pitch_y = ch + 6 * s;
    let grid_w = (GRID_COLS - 1) * pitch_x + cw;
    let grid_h = (GRID_ROWS - 1) * pitch_y + ch;

    let ts = spec.target_scale;
    let (tcw, tch) = code_size(style, ts);
    let target_pitch = tcw + 6 * ts;
    let target_w = (TARGET_CELLS - 1) * target_pitch + tcw;

    let top = 40;
    let width = spec.width.max(grid_w + 80).max(target_w + 80);
    let height = spec.height.max(top + tch + 2 * pitch_y + grid_h + 40);
    let mut ink = GrayImage::new(width, height);

    let grid_x = (width - grid_w) / 2;
    let grid_y = top + tch + 2 * pitch_y;
    let mut grid_cells = Vec::with_capacity(cells);
    for (i, glyphs) in grid_glyphs.iter().enumerate() {
        let ox = grid_x + (i % GRID_COLS) * pitch_x;
        let oy = grid_y + (i / GRID_COLS) * pitch_y;
        draw_code(&mut ink, ox as i64, oy as i64, glyphs, style, s, 255);
        grid_cells.push(CellBox::from_rect(ox as f32, oy as f32, cw as f32, ch as f32));
    }

    let target_x = (width - target_w) / 2;
    let mut target_cells = Vec::with_capacity(TARGET_CELLS);
    for (i, glyphs) in target_glyphs.iter().enumerate() {
        let ox = target_x + i * target_pitch;
        draw_code(&mut ink, ox as i64, top as i64, glyphs, style, ts, 255);
        target_cells.push(CellBox::from_rect(ox as f32, top as f32, tcw as f32, tch as f32));
    }

    let mut rng = XorShift64::new(spec.seed);
    let noise = spec.noise as i64;
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let a = ink.get(x, y) as f32 / 255.0;
            let bg = spec.background as f32 + spec.gradient * x as f32 / width as f32;
            let mut v = bg + (spec.ink as f32 - bg) * a;
            if noise > 0 {
                v += (rng.below(2 * noise as u64 + 1) as i64 - noise) as f32;
            }
            out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
        }
    }

    Ok(SyntheticBoard {
        frame: ImageFrame::from_gray(&out),
        grid_cells,
        target_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_is_reproducible() {
        let mut a = XorShift64::new(42);
        let mut b = XorShift64::new(42);
        let xs: Vec<_> = (0..5).map(|_| a.next_u64()).collect();
        let ys: Vec<_> = (0..5).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
        // first step from seed 1: 1 ^ 1<<13, then ^>>7, then ^<<17
        let mut one = XorShift64::new(0);
        assert_eq!(one.next_u64(), 1082269761);
    }

    #[test]
    fn target_wraps_around_the_grid() {
        let grid: Vec<String> = (0..80).map(|i| format!("{:02}", i)).collect();
        assert_eq!(target_at(&grid, 78), vec!["78", "79", "00", "01"]);
    }

    #[test]
    fn board_boxes_cover_the_codes() {
        let mut rng = XorShift64::new(3);
        let grid = random_codes(Alphabet::Digits, 80, &mut rng);
        let target = target_at(&grid, 10);
        let board = render_board(Alphabet::Digits, &grid, &target, &BoardSpec::default()).unwrap();
        assert_eq!(board.grid_cells.len(), 80);
        assert_eq!(board.target_cells.len(), 4);
        let gray = board.frame.to_gray();
        let first = board.grid_cells[0];
        let inside = (first.y as usize..(first.y + first.h) as usize)
            .flat_map(|y| (first.x as usize..(first.x + first.w) as usize).map(move |x| (x, y)))
            .filter(|&(x, y)| gray.get(x, y) == 220)
            .count();
        assert!(inside > 20);
        // target strip sits above the grid
        assert!(board.target_cells[0].y + board.target_cells[0].h < first.y);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let grid = vec!["12".to_string(); 80];
        let target = vec!["12".to_string(); 4];
        let spec = BoardSpec::default();
        assert_eq!(
            render_board(Alphabet::Digits, &grid[..79], &target, &spec).unwrap_err(),
            SynthError::CodeCount {
                expected: 80,
                got: 79
            }
        );
        assert!(matches!(
            render_board(Alphabet::Latin, &grid, &target, &spec),
            Err(SynthError::BadCode { .. })
        ));
        let mut short = grid.clone();
        short[5] = "1".to_string();
        assert!(render_board(Alphabet::Digits, &short, &target, &spec).is_err());
    }
}
