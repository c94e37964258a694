use glyphgrid_core::CellBox;
use glyphgrid_glyphs::synth::{random_codes, render_board, target_at, BoardSpec, XorShift64};
use glyphgrid_glyphs::{extract_cell, Alphabet, CellParams};
use glyphgrid_match::{
    find_match, find_match_by_text, MatchResult, PixelMatchParams, TextMatchParams,
};

fn padded(cell: &CellBox) -> CellBox {
    CellBox::from_center(cell.cx, cell.cy, cell.w * 1.25, cell.h * 1.5)
}

#[test]
fn pixel_mode_aligns_rendered_target_with_grid() {
    let params = CellParams::default();
    for (alphabet, position) in [
        (Alphabet::Runes, 43),
        (Alphabet::Dots, 78),
        (Alphabet::Greek, 7),
    ] {
        let mut rng = XorShift64::new(42);
        let grid = random_codes(alphabet, 80, &mut rng);
        let target = target_at(&grid, position);
        let spec = BoardSpec {
            noise: 8,
            gradient: 40.0,
            ..BoardSpec::for_alphabet(alphabet)
        };
        let board = render_board(alphabet, &grid, &target, &spec).unwrap();
        let sample = |c: &CellBox| extract_cell(&board.frame, &padded(c), &params).unwrap();
        let grid_samples: Vec<_> = board.grid_cells.iter().map(sample).collect();
        let target_samples: Vec<_> = board.target_cells.iter().map(sample).collect();

        let m = find_match(&target_samples, &grid_samples, &PixelMatchParams::default()).unwrap();
        assert_eq!(m.position, position, "{alphabet}");
        assert!(
            m.confidence > 0.5,
            "{alphabet}: confidence {}",
            m.confidence
        );
    }
}

#[test]
fn text_mode_reports_row_and_column() {
    let mut rng = XorShift64::new(1);
    let grid = random_codes(Alphabet::LatinDigits, 80, &mut rng);
    let target = target_at(&grid, 57);
    let m = find_match_by_text(&target, &grid, &TextMatchParams::default()).unwrap();
    assert_eq!((m.position, m.row, m.col, m.cols), (57, 6, 8, 10));
}

#[test]
fn match_result_serializes_with_plain_field_names() {
    let grid: Vec<String> = (0..80).map(|i| format!("{:02}", (i * 37 + 11) % 100)).collect();
    let target = &grid[10..14];
    let m = find_match_by_text(target, &grid, &TextMatchParams::default()).unwrap();
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["position"], 10);
    assert_eq!(json["row"], 2);
    assert_eq!(json["col"], 1);
    assert_eq!(json["score"], 0.0);
    let back: MatchResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, m);
}
