//! Alignment over decoded code strings.

use glyphgrid_core::UNREADABLE_CODE;
use serde::{Deserialize, Serialize};

use crate::result::{Candidate, MatchResult};

/// Fuzzy text alignment thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMatchParams {
    /// Highest total cost accepted for a fuzzy match.
    pub max_cost: f32,
    /// Lower bound of the reported confidence.
    pub confidence_floor: f32,
}

impl Default for TextMatchParams {
    fn default() -> Self {
        Self {
            max_cost: 3.0,
            confidence_floor: 0.1,
        }
    }
}

/// Mismatch cost between one observed target code and one grid code.
///
/// - an unreadable code on either side: 2
/// - equal codes: 0
/// - same length: number of differing characters
/// - target a strict prefix of the grid code (dropped trailing glyph): 0.5
/// - same first character: 1
/// - anything else: 2
pub fn code_cost(target: &str, grid: &str) -> f32 {
    if target == UNREADABLE_CODE || grid == UNREADABLE_CODE {
        return 2.0;
    }
    if target == grid {
        return 0.0;
    }
    let (tn, gn) = (target.chars().count(), grid.chars().count());
    if tn == gn {
        return target
            .chars()
            .zip(grid.chars())
            .filter(|(a, b)| a != b)
            .count() as f32;
    }
    if tn > 0 && tn < gn && grid.starts_with(target) {
        return 0.5;
    }
    match (target.chars().next(), grid.chars().next()) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 2.0,
    }
}

fn exact_at<S: AsRef<str>, G: AsRef<str>>(target: &[S], grid: &[G], position: usize) -> bool {
    target.iter().enumerate().all(|(t, code)| {
        let code = code.as_ref();
        code != UNREADABLE_CODE && code == grid[(position + t) % grid.len()].as_ref()
    })
}

fn cost_at<S: AsRef<str>, G: AsRef<str>>(target: &[S], grid: &[G], position: usize) -> f32 {
    target
        .iter()
        .enumerate()
        .map(|(t, code)| code_cost(code.as_ref(), grid[(position + t) % grid.len()].as_ref()))
        .sum()
}

/// Locate `target` inside `grid` (with wraparound) by code text.
///
/// The first exact hit wins with score 0 and confidence 1. Otherwise the
/// lowest total [`code_cost`] is accepted if it is within
/// `params.max_cost`. Returns `None` for fewer than 2 target codes, fewer
/// than 4 grid codes, or when no position is close enough.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip_all,
        fields(target = target.len(), grid = grid.len())
    )
)]
pub fn find_match_by_text<S: AsRef<str>, G: AsRef<str>>(
    target: &[S],
    grid: &[G],
    params: &TextMatchParams,
) -> Option<MatchResult> {
    let n = grid.len();
    if target.len() < 2 || n < 4 {
        return None;
    }

    if let Some(position) = (0..n).find(|&p| exact_at(target, grid, p)) {
        log::debug!("exact text match at {position}");
        return Some(MatchResult::new(position, n, 0.0, 1.0));
    }

    let mut best = Candidate {
        position: 0,
        score: f32::INFINITY,
    };
    let mut second = Candidate {
        position: 0,
        score: f32::INFINITY,
    };
    for position in 0..n {
        let c = Candidate {
            position,
            score: cost_at(target, grid, position),
        };
        if c.score < best.score {
            second = best;
            best = c;
        } else if c.score < second.score {
            second = c;
        }
    }

    if best.score > params.max_cost {
        log::debug!(
            "no text match: best cost {:.1} at {} exceeds {:.1}",
            best.score,
            best.position,
            params.max_cost
        );
        return None;
    }
    let gap = (second.score - best.score) / target.len() as f32;
    let confidence = gap.min(1.0).max(params.confidence_floor);
    log::debug!(
        "fuzzy text match at {}: cost {:.1}, runner-up {:.1}",
        best.position,
        best.score,
        second.score
    );
    let mut result = MatchResult::new(best.position, n, best.score, confidence);
    if second.score.is_finite() {
        result.alternatives.push(second);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{:02}", (i * 37 + 11) % 100)).collect()
    }

    fn embed(grid: &mut [String], target: &[&str], position: usize) {
        let n = grid.len();
        for (t, code) in target.iter().enumerate() {
            grid[(position + t) % n] = code.to_string();
        }
    }

    #[test]
    fn code_costs() {
        assert_eq!(code_cost("28", "28"), 0.0);
        assert_eq!(code_cost("28", "29"), 1.0);
        assert_eq!(code_cost("28", "93"), 2.0);
        assert_eq!(code_cost("2", "28"), 0.5);
        assert_eq!(code_cost("2", "38"), 2.0);
        assert_eq!(code_cost("281", "28"), 1.0);
        assert_eq!(code_cost("??", "28"), 2.0);
        assert_eq!(code_cost("??", "??"), 2.0);
        assert_eq!(code_cost("", "28"), 2.0);
        // Greek glyphs are multi-byte; lengths count characters
        assert_eq!(code_cost("ΨΩ", "ΨΔ"), 1.0);
        assert_eq!(code_cost("Ψ", "ΨΔ"), 0.5);
    }

    #[test]
    fn numeric_target_at_43() {
        let mut g = grid(80);
        let target = ["28", "98", "94", "55"];
        embed(&mut g, &target, 43);
        let m = find_match_by_text(&target, &g, &TextMatchParams::default()).unwrap();
        assert_eq!((m.position, m.row, m.col), (43, 5, 4));
        assert_eq!(m.score, 0.0);
        assert_eq!(m.confidence, 1.0);
        assert!(m.alternatives.is_empty());
    }

    #[test]
    fn too_short_inputs_are_rejected() {
        let g = grid(80);
        let p = TextMatchParams::default();
        assert!(find_match_by_text(&["28"], &g, &p).is_none());
        assert!(find_match_by_text(&["28", "98"], &g[..3], &p).is_none());
    }

    #[test]
    fn one_corrupted_character_still_matches() {
        let mut g = grid(80);
        let p = TextMatchParams::default();
        embed(&mut g, &["28", "98", "94", "55"], 20);
        let m = find_match_by_text(&["28", "98", "04", "55"], &g, &p).unwrap();
        assert_eq!(m.position, 20);
        assert_relative_eq!(m.score, 1.0);
        assert!(m.confidence >= 0.1 && m.confidence <= 1.0);
        assert_eq!(m.alternatives.len(), 1);
        assert!(m.alternatives[0].score > m.score);
    }

    #[test]
    fn dropped_trailing_glyph_costs_half() {
        let mut g = grid(80);
        let p = TextMatchParams::default();
        embed(&mut g, &["28", "98", "94", "55"], 61);
        let m = find_match_by_text(&["28", "9", "94", "55"], &g, &p).unwrap();
        assert_eq!(m.position, 61);
        assert_relative_eq!(m.score, 0.5);
    }

    #[test]
    fn cost_ceiling_rejects_heavy_corruption() {
        let mut g = grid(80);
        let p = TextMatchParams::default();
        embed(&mut g, &["28", "98", "94", "55"], 5);
        // two slots with both characters wrong: cost 4
        assert!(find_match_by_text(&["28", "01", "67", "55"], &g, &p).is_none());
        // two slots with one wrong character each: cost 2
        let m = find_match_by_text(&["20", "98", "97", "55"], &g, &p).unwrap();
        assert_eq!(m.position, 5);
        assert_relative_eq!(m.score, 2.0);
    }

    #[test]
    fn wraparound_target_is_found() {
        let mut g = grid(80);
        let target = ["28", "98", "94", "55"];
        embed(&mut g, &target, 78);
        let m = find_match_by_text(&target, &g, &TextMatchParams::default()).unwrap();
        assert_eq!(m.position, 78);
        assert_eq!((m.row, m.col), (8, 9));
        assert_eq!(m.score, 0.0);
    }

    #[test]
    fn absent_codes_never_match_exactly() {
        let g: Vec<String> = (0..80)
            .map(|i| format!("{}{}", (b'A' + (i % 26) as u8) as char, i % 10))
            .collect();
        let p = TextMatchParams::default();
        let m = find_match_by_text(&["ΨΩ", "ΔΣ", "ΦΛ", "ΞΠ"], &g, &p);
        assert!(m.is_none_or(|m| m.score > 0.0));
    }

    #[test]
    fn unreadable_cells_are_mismatches() {
        let mut g = grid(80);
        let p = TextMatchParams::default();
        embed(&mut g, &["28", "98", "94", "55"], 33);
        let m = find_match_by_text(&["28", "??", "94", "55"], &g, &p).unwrap();
        assert_eq!(m.position, 33);
        assert_relative_eq!(m.score, 2.0);

        // an unreadable frame never aligns with itself
        let blank = vec!["??"; 80];
        assert!(find_match_by_text(&["??"; 4], &blank, &TextMatchParams::default()).is_none());
    }
}
