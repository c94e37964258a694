use glyphgrid_core::{AdaptiveThresholdParams, CellBox, GrayImage, ImageFrame};
use glyphgrid_detect::{BandParams, ColumnParams, DetectorParams, GridDetector, Strategy};
use glyphgrid_glyphs::synth::{
    random_codes, render_board, target_at, BoardSpec, SyntheticBoard, XorShift64,
};
use glyphgrid_glyphs::Alphabet;

fn render(alphabet: Alphabet, seed: u64, spec: BoardSpec) -> SyntheticBoard {
    let mut rng = XorShift64::new(seed);
    let grid = random_codes(alphabet, 80, &mut rng);
    let target = target_at(&grid, 43);
    render_board(alphabet, &grid, &target, &spec).unwrap()
}

fn board(alphabet: Alphabet, seed: u64, gradient: f32) -> SyntheticBoard {
    let spec = BoardSpec {
        noise: 8,
        gradient,
        ..BoardSpec::for_alphabet(alphabet)
    };
    render(alphabet, seed, spec)
}

/// Board whose noise pattern also follows `seed`.
fn grainy_board(alphabet: Alphabet, seed: u64, noise: u8) -> SyntheticBoard {
    let spec = BoardSpec {
        noise,
        gradient: 40.0,
        seed,
        ..BoardSpec::for_alphabet(alphabet)
    };
    render(alphabet, seed, spec)
}

fn noisy_board(alphabet: Alphabet, seed: u64) -> SyntheticBoard {
    board(alphabet, seed, 40.0)
}

fn max_center_error(found: &[CellBox], truth: &[CellBox]) -> f32 {
    assert_eq!(found.len(), truth.len());
    found
        .iter()
        .zip(truth)
        .map(|(a, b)| (a.cx - b.cx).abs().max((a.cy - b.cy).abs()))
        .fold(0.0, f32::max)
}

#[test]
fn adaptive_strategy_locates_every_alphabet() {
    let detector = GridDetector::default();
    for alphabet in Alphabet::ALL {
        let board = noisy_board(alphabet, 42);
        let gray = board.frame.to_gray();
        let grid = detector
            .detect_with_strategy(&gray.view(), Strategy::Adaptive)
            .unwrap_or_else(|| panic!("{alphabet}: grid not found"));
        assert_eq!((grid.rows, grid.cols), (8, 10));
        let err = max_center_error(&grid.grid_cells, &board.grid_cells);
        assert!(err <= 2.0, "{alphabet}: grid center error {err}");

        let target = grid
            .target_cells
            .as_ref()
            .unwrap_or_else(|| panic!("{alphabet}: target not found"));
        let err = max_center_error(target, &board.target_cells);
        assert!(err <= 3.5, "{alphabet}: target center error {err}");
    }
}

#[test]
fn adaptive_strategy_survives_heavy_noise() {
    let detector = GridDetector::default();
    for alphabet in Alphabet::ALL {
        for seed in 1..=3 {
            let board = grainy_board(alphabet, seed, 25);
            let gray = board.frame.to_gray();
            let grid = detector
                .detect_with_strategy(&gray.view(), Strategy::Adaptive)
                .unwrap_or_else(|| panic!("{alphabet}/{seed}: grid not found"));
            let err = max_center_error(&grid.grid_cells, &board.grid_cells);
            assert!(err <= 2.0, "{alphabet}/{seed}: grid center error {err}");

            let target = grid
                .target_cells
                .as_ref()
                .unwrap_or_else(|| panic!("{alphabet}/{seed}: target not found"));
            let err = max_center_error(target, &board.target_cells);
            assert!(err <= 3.5, "{alphabet}/{seed}: target center error {err}");
        }
    }
}

#[test]
fn detrended_strategy_locates_block_and_dot_boards() {
    let detector = GridDetector::default();
    for alphabet in [Alphabet::Digits, Alphabet::Dots, Alphabet::Runes] {
        let board = noisy_board(alphabet, 42);
        let gray = board.frame.to_gray();
        let grid = detector
            .detect_with_strategy(&gray.view(), Strategy::Detrended)
            .unwrap_or_else(|| panic!("{alphabet}: grid not found"));
        let err = max_center_error(&grid.grid_cells, &board.grid_cells);
        assert!(err <= 2.0, "{alphabet}: grid center error {err}");
        assert!(grid.has_target(), "{alphabet}");
    }
}

#[test]
fn detrended_fallback_covers_empty_threshold_mask() {
    // a floor above white leaves the thresholded mask empty
    let params = DetectorParams {
        threshold: AdaptiveThresholdParams {
            floor_ratio: 10.0,
            ..AdaptiveThresholdParams::default()
        },
        ..DetectorParams::default()
    };
    let board = noisy_board(Alphabet::Digits, 42);
    let gray = board.frame.to_gray();
    let detector = GridDetector::new(params.clone());
    assert!(detector
        .detect_with_strategy(&gray.view(), Strategy::Adaptive)
        .is_none());

    let grid = detector.detect_gray(&gray.view()).expect("detrended grid");
    assert!(max_center_error(&grid.grid_cells, &board.grid_cells) <= 2.0);
    assert!(grid.has_target());

    let strict = GridDetector::new(DetectorParams {
        fallback_detrended: false,
        ..params
    });
    assert!(strict.detect_gray(&gray.view()).is_none());
}

#[test]
fn detrended_fallback_supplies_a_missing_target() {
    // a dense row cutoff keeps the grid rows but drops the narrower strip
    let params = DetectorParams {
        bands: BandParams {
            min_density: 0.2,
            ..BandParams::default()
        },
        ..DetectorParams::default()
    };
    let board = noisy_board(Alphabet::Runes, 42);
    let gray = board.frame.to_gray();
    let detector = GridDetector::new(params.clone());
    let adaptive = detector
        .detect_with_strategy(&gray.view(), Strategy::Adaptive)
        .expect("thresholded grid");
    assert!(!adaptive.has_target());

    let grid = detector.detect_gray(&gray.view()).expect("grid");
    assert!(max_center_error(&grid.grid_cells, &board.grid_cells) <= 2.0);
    let target = grid
        .target_cells
        .as_ref()
        .expect("target from detrended pass");
    assert!(max_center_error(target, &board.target_cells) <= 3.5);

    let strict = GridDetector::new(DetectorParams {
        fallback_detrended: false,
        ..params
    });
    let grid = strict.detect_gray(&gray.view()).expect("grid");
    assert!(!grid.has_target());
}

#[test]
fn equal_slots_still_land_on_their_codes() {
    let params = DetectorParams {
        columns: ColumnParams {
            refine_slots: false,
            ..ColumnParams::default()
        },
        ..DetectorParams::default()
    };
    let equal = GridDetector::new(params);
    let refined = GridDetector::default();
    for alphabet in [Alphabet::Digits, Alphabet::Dots] {
        let board = noisy_board(alphabet, 42);
        let gray = board.frame.to_gray();
        let coarse = equal
            .detect_with_strategy(&gray.view(), Strategy::Adaptive)
            .unwrap();
        let fine = refined
            .detect_with_strategy(&gray.view(), Strategy::Adaptive)
            .unwrap();
        for (found, truth) in coarse.grid_cells.iter().zip(&board.grid_cells) {
            assert!((found.cx - truth.cx).abs() < 0.5 * found.w, "{alphabet}");
            assert!((found.cy - truth.cy).abs() <= 2.0, "{alphabet}");
        }
        let coarse_err = max_center_error(&coarse.grid_cells, &board.grid_cells);
        let fine_err = max_center_error(&fine.grid_cells, &board.grid_cells);
        assert!(
            fine_err < coarse_err,
            "{alphabet}: {fine_err} vs {coarse_err}"
        );
    }
}

#[test]
fn cells_cover_their_codes() {
    let board = noisy_board(Alphabet::Latin, 5);
    let grid = GridDetector::default().detect(&board.frame).unwrap();
    for (found, truth) in grid.grid_cells.iter().zip(&board.grid_cells) {
        assert!(found.w >= truth.w && found.h >= truth.h);
        assert!(found.area > truth.area);
    }
}

#[test]
fn blank_frame_has_no_grid() {
    let frame = ImageFrame::from_gray(&GrayImage::filled(320, 240, 30));
    assert!(GridDetector::default().detect(&frame).is_none());
}

#[test]
fn too_few_rows_is_not_a_grid() {
    // paint out the lower three rows of a real board
    let board = board(Alphabet::Digits, 9, 0.0);
    let mut gray = board.frame.to_gray();
    let cut = board.grid_cells[50].y as usize - 4;
    for y in cut..gray.height {
        for x in 0..gray.width {
            gray.set(x, y, 20);
        }
    }
    let detector = GridDetector::new(DetectorParams {
        fallback_detrended: true,
        ..DetectorParams::default()
    });
    assert!(detector.detect_gray(&gray.view()).is_none());
}

#[test]
fn missing_target_still_returns_grid() {
    let board = board(Alphabet::Runes, 11, 0.0);
    let mut gray = board.frame.to_gray();
    let bottom = board.target_cells[0].y + board.target_cells[0].h + 4.0;
    for y in 0..bottom as usize {
        for x in 0..gray.width {
            gray.set(x, y, 20);
        }
    }
    let grid = GridDetector::default().detect_gray(&gray.view()).unwrap();
    assert_eq!(grid.grid_cells.len(), 80);
    assert!(grid.target_cells.is_none());
}

#[test]
fn params_load_from_partial_json() {
    let json = r#"{ "threshold": { "bias": -15.0 }, "fallback_detrended": false }"#;
    let params: DetectorParams = serde_json::from_str(json).unwrap();
    assert_eq!(params.threshold.bias, -15.0);
    assert_eq!(params.threshold.smooth_radius, 2);
    assert!(params.columns.refine_slots);
    assert_eq!(params.threshold.block_size, 25);
    assert!(!params.fallback_detrended);
    assert_eq!(params.rows, 8);
}
