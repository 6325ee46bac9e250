//! Ochiai suspiciousness scoring
//!
//! `score(l) = ef / sqrt(total_failed * (ef + ep))`
//!
//! Reference: Abreu et al. (2007) "On the Accuracy of Spectrum-based Fault
//! Localization" - TAICPART-MUTATION

use std::collections::BTreeSet;

use tracing::debug;

use super::index::LineCoverageIndex;
use super::types::{FailedTests, LineSpectrum, SuspiciousnessMap, TestId};
use crate::error::{LocalizationError, Result};

/// Scores covered lines against a fixed set of failing tests.
#[derive(Debug, Clone, Copy)]
pub struct OchiaiScorer<'a> {
    failed: &'a FailedTests,
}

impl<'a> OchiaiScorer<'a> {
    /// Ochiai is undefined without failing tests, so an empty set is rejected.
    pub fn new(failed: &'a FailedTests) -> Result<Self> {
        if failed.is_empty() {
            return Err(LocalizationError::InvalidInput(
                "no failing tests supplied; Ochiai is undefined".to_string(),
            ));
        }
        Ok(Self { failed })
    }

    pub fn total_failed(&self) -> usize {
        self.failed.len()
    }

    /// Spectrum counts for a line covered by `covering`.
    pub fn spectrum(&self, covering: &BTreeSet<TestId>) -> LineSpectrum {
        let ef = covering
            .iter()
            .filter(|test| self.failed.contains(*test))
            .count();
        LineSpectrum {
            ef,
            ep: covering.len() - ef,
            total_failed: self.failed.len(),
        }
    }

    /// Score every line in `index`.
    pub fn score(&self, index: &LineCoverageIndex) -> SuspiciousnessMap {
        let mut scores = SuspiciousnessMap::new();

        for (line, covering) in index {
            // Non-empty failed set and non-empty covering set keep the
            // denominator positive.
            if let Some(score) = self.spectrum(covering).ochiai() {
                scores.insert(line.clone(), score);
            }
        }

        debug!(
            "Scored {} lines against {} failing tests",
            scores.len(),
            self.failed.len()
        );
        scores
    }
}

/// Score every line in `index` using `failed` as the failing test set.
pub fn score(index: &LineCoverageIndex, failed: &FailedTests) -> Result<SuspiciousnessMap> {
    Ok(OchiaiScorer::new(failed)?.score(index))
}
