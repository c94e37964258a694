use glyphgrid_core::CellBox;
use glyphgrid_glyphs::synth::{random_codes, render_board, target_at, BoardSpec, XorShift64};
use glyphgrid_glyphs::{
    detect_charset, extract_cell, identify_code, split_halves, Alphabet, CellParams, IdentifyParams,
    TemplateLibrary, UNREADABLE_CODE,
};

/// Ground-truth box grown the way a detector pads its cells.
fn padded(cell: &CellBox) -> CellBox {
    CellBox::from_center(cell.cx, cell.cy, cell.w * 1.25, cell.h * 1.5)
}

#[test]
fn every_code_on_a_noisy_board_reads_back() {
    let library = TemplateLibrary::default();
    let cell_params = CellParams::default();
    let params = IdentifyParams::default();
    for alphabet in Alphabet::ALL {
        let mut rng = XorShift64::new(42);
        let grid = random_codes(alphabet, 80, &mut rng);
        let target = target_at(&grid, 43);
        let spec = BoardSpec {
            noise: 8,
            gradient: 40.0,
            ..BoardSpec::for_alphabet(alphabet)
        };
        let board = render_board(alphabet, &grid, &target, &spec).unwrap();

        let templates = library.templates(alphabet);
        let read: Vec<String> = board
            .grid_cells
            .iter()
            .map(|c| {
                let sample = extract_cell(&board.frame, &padded(c), &cell_params).unwrap();
                identify_code(&sample, templates, &cell_params, &params)
            })
            .collect();
        let wrong: Vec<_> = read
            .iter()
            .zip(&grid)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .collect();
        assert!(wrong.is_empty(), "{alphabet}: misreads {wrong:?}");

        let target_read: Vec<String> = board
            .target_cells
            .iter()
            .map(|c| {
                let sample = extract_cell(&board.frame, &padded(c), &cell_params).unwrap();
                identify_code(&sample, templates, &cell_params, &params)
            })
            .collect();
        assert_eq!(target_read, target, "{alphabet}");
    }
}

#[test]
fn charset_is_recovered_from_board_cells() {
    let library = TemplateLibrary::default();
    let params = CellParams::default();
    for alphabet in Alphabet::ALL {
        let mut rng = XorShift64::new(7);
        let grid = random_codes(alphabet, 80, &mut rng);
        let target = target_at(&grid, 0);
        let spec = BoardSpec::for_alphabet(alphabet);
        let board = render_board(alphabet, &grid, &target, &spec).unwrap();
        let halves: Vec<_> = board.grid_cells[..20]
            .iter()
            .filter_map(|c| extract_cell(&board.frame, &padded(c), &params))
            .flat_map(|s| {
                let (l, r) = split_halves(&s, &params);
                [l, r]
            })
            .collect();
        assert_eq!(halves.len(), 40);
        assert_eq!(detect_charset(&halves, &library), Some(alphabet));
    }
}

#[test]
fn empty_cell_is_unreadable() {
    let library = TemplateLibrary::default();
    let params = CellParams::default();
    let mut rng = XorShift64::new(3);
    let grid = random_codes(Alphabet::Digits, 80, &mut rng);
    let target = target_at(&grid, 10);
    let board = render_board(Alphabet::Digits, &grid, &target, &BoardSpec::default()).unwrap();

    // a box in the blank margin left of the grid
    let first = &board.grid_cells[0];
    let blank = CellBox::from_rect(2.0, first.y, first.x - 6.0, first.h);
    let sample = extract_cell(&board.frame, &blank, &params).unwrap();
    let code = identify_code(
        &sample,
        library.templates(Alphabet::Digits),
        &params,
        &IdentifyParams::default(),
    );
    assert_eq!(code, UNREADABLE_CODE);
}
