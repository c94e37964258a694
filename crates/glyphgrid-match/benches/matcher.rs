use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glyphgrid_core::{GrayImage, NormalizedSample, PixelRect};
use glyphgrid_glyphs::render::{code_size, draw_code};
use glyphgrid_glyphs::synth::{random_codes, target_at, XorShift64};
use glyphgrid_glyphs::{normalize_region, Alphabet, CellParams};
use glyphgrid_match::{find_match, find_match_by_text, PixelMatchParams, TextMatchParams};

fn code_sample(alphabet: Alphabet, code: &str) -> NormalizedSample {
    let style = alphabet.style();
    let glyphs: Vec<_> = code.chars().filter_map(|c| alphabet.glyph(c)).collect();
    let (w, h) = code_size(style, 3);
    let mut img = GrayImage::new(w + 8, h + 8);
    draw_code(&mut img, 4, 4, &glyphs, style, 3, 255);
    normalize_region(
        &img.view(),
        PixelRect::full(img.width, img.height),
        &CellParams::default(),
    )
}

fn bench_matcher(c: &mut Criterion) {
    let mut rng = XorShift64::new(42);
    let grid = random_codes(Alphabet::Digits, 80, &mut rng);
    let mut target = target_at(&grid, 43);
    target[2] = "??".to_string();

    c.bench_function("text_fuzzy_80", |b| {
        let params = TextMatchParams::default();
        b.iter(|| find_match_by_text(black_box(&target), black_box(&grid), &params))
    });

    let cells: Vec<_> = grid
        .iter()
        .map(|c| code_sample(Alphabet::Digits, c))
        .collect();
    let targets: Vec<_> = target_at(&grid, 43)
        .iter()
        .map(|c| code_sample(Alphabet::Digits, c))
        .collect();
    c.bench_function("pixel_ensemble_80", |b| {
        let params = PixelMatchParams::default();
        b.iter(|| find_match(black_box(&targets), black_box(&cells), &params))
    });
}

criterion_group!(benches, bench_matcher);
criterion_main!(benches);
