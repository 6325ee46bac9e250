//! Core data model for spectrum-based fault localization.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a source statement, unique within a program version.
pub type LineId = String;

/// Opaque identifier of a test case, unique within a test run.
pub type TestId = String;

/// Test → lines it executed. Produced by the coverage loader.
pub type CoverageMatrix = BTreeMap<TestId, BTreeSet<LineId>>;

/// Tests known to have failed.
pub type FailedTests = BTreeSet<TestId>;

/// Line → Ochiai suspiciousness in `[0, 1]`.
pub type SuspiciousnessMap = BTreeMap<LineId, f64>;

/// Per-line spectrum counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSpectrum {
    /// Failing tests that executed the line
    pub ef: usize,
    /// Passing tests that executed the line
    pub ep: usize,
    /// Failing tests in the whole run
    pub total_failed: usize,
}

impl LineSpectrum {
    /// Tests that executed the line, regardless of outcome.
    pub fn covering(&self) -> usize {
        self.ef + self.ep
    }

    /// Ochiai coefficient: `ef / sqrt(total_failed * (ef + ep))`.
    ///
    /// Returns `None` when the denominator is zero.
    pub fn ochiai(&self) -> Option<f64> {
        let denom = (self.total_failed as f64 * self.covering() as f64).sqrt();
        if denom > 0.0 {
            Some(self.ef as f64 / denom)
        } else {
            None
        }
    }
}

/// One entry of a descending suspiciousness listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLine {
    pub line: LineId,
    pub score: f64,
    /// 1-based rank; tied lines share the best rank
    pub rank: usize,
}
