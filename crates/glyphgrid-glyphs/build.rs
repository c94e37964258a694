use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Deserialize)]
struct GlyphFile {
    alphabets: Vec<AlphabetEntry>,
}

#[derive(Deserialize)]
struct AlphabetEntry {
    name: String,
    style: String,
    #[serde(default)]
    glyphs: Vec<GlyphEntry>,
    #[serde(default)]
    include: Vec<String>,
}

#[derive(Deserialize, Clone)]
struct GlyphEntry {
    ch: String,
    rows: Vec<String>,
}

fn shape_for(style: &str) -> (usize, usize) {
    match style {
        "block" => (5, 7),
        "dots" => (2, 3),
        other => panic!("unknown glyph style {other:?}"),
    }
}

fn main() {
    let manifest = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let src = manifest.join("data").join("glyphs.json");
    println!("cargo:rerun-if-changed={}", src.display());

    let text = std::fs::read_to_string(&src).expect("read data/glyphs.json");
    let file: GlyphFile = serde_json::from_str(&text).expect("parse data/glyphs.json");

    let mut resolved: BTreeMap<String, Vec<GlyphEntry>> = BTreeMap::new();
    let mut out = String::new();

    for alphabet in &file.alphabets {
        let label = &alphabet.name;
        let (width, height) = shape_for(&alphabet.style);
        let mut glyphs = alphabet.glyphs.clone();
        for name in &alphabet.include {
            let included = resolved
                .get(name)
                .unwrap_or_else(|| panic!("{label}: include {name:?} must be declared first"));
            glyphs.extend(included.iter().cloned());
        }
        assert!(!glyphs.is_empty(), "{label}: no glyphs");

        let mut seen = HashSet::new();
        let ident = alphabet.name.to_uppercase();
        writeln!(out, "pub const {ident}: &[GlyphBitmap] = &[").unwrap();
        for glyph in &glyphs {
            let mut chars = glyph.ch.chars();
            let ch = chars.next().expect("empty glyph char");
            assert!(
                chars.next().is_none(),
                "{label}: {:?} is not one char",
                glyph.ch
            );
            assert!(seen.insert(ch), "{label}: duplicate glyph {ch:?}");
            assert_eq!(glyph.rows.len(), height, "{label}: {ch:?} row count");

            let mut masks = Vec::with_capacity(height);
            for row in &glyph.rows {
                assert_eq!(row.chars().count(), width, "{label}: {ch:?} row width");
                let mask = row
                    .chars()
                    .fold(0u8, |acc, c| (acc << 1) | u8::from(c == '#'));
                masks.push(format!("0b{mask:0width$b}"));
            }
            writeln!(
                out,
                "    GlyphBitmap {{ ch: {ch:?}, width: {width}, rows: &[{}] }},",
                masks.join(", ")
            )
            .unwrap();
        }
        writeln!(out, "];\n").unwrap();
        resolved.insert(alphabet.name.clone(), glyphs);
    }

    let dest = PathBuf::from(std::env::var("OUT_DIR").expect("out dir")).join("builtins.rs");
    std::fs::write(dest, out).expect("write builtins.rs");
}
