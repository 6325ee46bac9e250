//! Spectrum-Based Fault Localization core
//!
//! A pure pipeline of three stateless transformations:
//!
//! ```text
//! CoverageMatrix ─invert─▶ LineCoverageIndex ─ochiai─▶ SuspiciousnessMap ─rank─▶ usize
//! ```
//!
//! - **index**: test → lines inverted into line → covering tests
//! - **ochiai**: `ef / sqrt(total_failed * (ef + ep))` per covered line
//! - **rank**: best-case rank for ties (`1 + #strictly greater`)
//!
//! Nothing here performs I/O or holds state across calls, so independent
//! analyses can run on separate threads without coordination.

pub mod index;
pub mod ochiai;
pub mod rank;
mod types;

pub use index::{invert, LineCoverageIndex};
pub use ochiai::OchiaiScorer;
pub use rank::{lookup_score, ranking};
pub use types::*;

use tracing::debug;

use crate::error::Result;

/// Ochiai suspiciousness of every covered line.
///
/// Fails with [`LocalizationError::InvalidInput`](crate::LocalizationError::InvalidInput)
/// when `failed` is empty.
pub fn compute_suspiciousness(
    matrix: &CoverageMatrix,
    failed: &FailedTests,
) -> Result<SuspiciousnessMap> {
    let scorer = OchiaiScorer::new(failed)?;
    let index = invert(matrix);
    debug!(
        "Inverted coverage of {} tests into {} covered lines",
        matrix.len(),
        index.len()
    );
    Ok(scorer.score(&index))
}

/// Best-case 1-based rank of `line` among the scored lines.
pub fn rank_of(scores: &SuspiciousnessMap, line: &str) -> Result<usize> {
    rank::rank(scores, line)
}

/// Suspiciousness of `line`.
pub fn score_of(scores: &SuspiciousnessMap, line: &str) -> Result<f64> {
    rank::lookup_score(scores, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalizationError;

    fn set(items: &[&str]) -> std::collections::BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> CoverageMatrix {
        let mut m = CoverageMatrix::new();
        m.insert("t1".to_string(), set(&["l1", "l2"]));
        m.insert("t2".to_string(), set(&["l1"]));
        m.insert("t3".to_string(), set(&["l2"]));
        m
    }

    #[test]
    fn test_pipeline_concrete_case() {
        let scores = compute_suspiciousness(&sample(), &set(&["t1"])).unwrap();

        let expected = 1.0 / 2.0_f64.sqrt();
        assert!((score_of(&scores, "l1").unwrap() - 0.7071).abs() < 1e-4);
        assert!((score_of(&scores, "l2").unwrap() - expected).abs() < 1e-12);
        assert_eq!(rank_of(&scores, "l1").unwrap(), 1);
        assert_eq!(rank_of(&scores, "l2").unwrap(), 1);
    }

    #[test]
    fn test_pipeline_rejects_zero_failed() {
        let err = compute_suspiciousness(&sample(), &FailedTests::new()).unwrap_err();
        assert!(matches!(err, LocalizationError::InvalidInput(_)));
    }

    #[test]
    fn test_pipeline_rejects_zero_failed_on_empty_matrix() {
        assert!(compute_suspiciousness(&CoverageMatrix::new(), &FailedTests::new()).is_err());
    }

    #[test]
    fn test_pipeline_unknown_line() {
        let scores = compute_suspiciousness(&sample(), &set(&["t1"])).unwrap();
        assert_eq!(
            rank_of(&scores, "never_covered_line").unwrap_err(),
            LocalizationError::UnknownLine("never_covered_line".to_string())
        );
        assert!(score_of(&scores, "never_covered_line").is_err());
    }

    #[test]
    fn test_pipeline_uncovered_line_not_scored() {
        let mut m = sample();
        m.insert("t4".to_string(), set(&[]));
        let scores = compute_suspiciousness(&m, &set(&["t4"])).unwrap();
        // t4 failed but covered nothing: every line has ef = 0
        assert_eq!(scores.len(), 2);
        assert!(scores.values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_pipeline_buggy_line_ranks_first() {
        let mut m = CoverageMatrix::new();
        m.insert("pass_a".to_string(), set(&["init", "loop"]));
        m.insert("pass_b".to_string(), set(&["init", "loop", "exit"]));
        m.insert("fail_a".to_string(), set(&["init", "bug"]));
        m.insert("fail_b".to_string(), set(&["init", "loop", "bug"]));

        let scores = compute_suspiciousness(&m, &set(&["fail_a", "fail_b"])).unwrap();
        assert_eq!(rank_of(&scores, "bug").unwrap(), 1);
        assert!((score_of(&scores, "bug").unwrap() - 1.0).abs() < f64::EPSILON);
        assert_eq!(score_of(&scores, "exit").unwrap(), 0.0);
        assert_eq!(rank_of(&scores, "exit").unwrap(), scores.len());
    }
}
