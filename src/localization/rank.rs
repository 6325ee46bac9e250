//! Suspiciousness ranking
//!
//! Ranks use the best-case policy for ties: the rank of a line is one plus
//! the number of lines with a strictly greater score, so every line tied
//! with it shares the same rank. Scores are compared exactly.

use std::cmp::Ordering;

use super::types::{RankedLine, SuspiciousnessMap};
use crate::error::{LocalizationError, Result};

/// Suspiciousness of `target`.
pub fn lookup_score(scores: &SuspiciousnessMap, target: &str) -> Result<f64> {
    scores
        .get(target)
        .copied()
        .ok_or_else(|| LocalizationError::UnknownLine(target.to_string()))
}

/// 1-based best-case rank of `target`, in `1..=scores.len()`.
pub fn rank(scores: &SuspiciousnessMap, target: &str) -> Result<usize> {
    let target_score = lookup_score(scores, target)?;
    let above = scores
        .values()
        .filter(|score| score.total_cmp(&target_score) == Ordering::Greater)
        .count();
    Ok(above + 1)
}

/// Every scored line, most suspicious first.
///
/// Tied lines carry the same rank and are listed in ascending line order.
pub fn ranking(scores: &SuspiciousnessMap) -> Vec<RankedLine> {
    let mut entries: Vec<(&String, f64)> = scores.iter().map(|(l, s)| (l, *s)).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut result = Vec::with_capacity(entries.len());
    let mut current_rank = 0;
    let mut previous: Option<f64> = None;

    for (position, (line, score)) in entries.into_iter().enumerate() {
        if previous.map_or(true, |p| p.total_cmp(&score) != Ordering::Equal) {
            current_rank = position + 1;
            previous = Some(score);
        }
        result.push(RankedLine {
            line: line.clone(),
            score,
            rank: current_rank,
        });
    }

    result
}

#[cfg(test)]
#[path = "rank_tests.rs"]
mod tests;
