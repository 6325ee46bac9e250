//! Spectrum-based fault localization.
//!
//! Given which lines each test executed and which tests failed, score every
//! covered line with the Ochiai formula and rank lines by suspiciousness.
//!
//! ```
//! use std::collections::BTreeSet;
//! use sbfl::{compute_suspiciousness, rank_of, CoverageMatrix, FailedTests};
//!
//! let mut matrix = CoverageMatrix::new();
//! matrix.insert("t1".to_string(), BTreeSet::from(["l1".to_string(), "l2".to_string()]));
//! matrix.insert("t2".to_string(), BTreeSet::from(["l1".to_string()]));
//! matrix.insert("t3".to_string(), BTreeSet::from(["l2".to_string()]));
//! let failed = FailedTests::from(["t1".to_string()]);
//!
//! let scores = compute_suspiciousness(&matrix, &failed).unwrap();
//! assert_eq!(rank_of(&scores, "l1").unwrap(), 1);
//! assert_eq!(rank_of(&scores, "l2").unwrap(), 1);
//! ```

pub mod config;
pub mod coverage;
pub mod error;
pub mod localization;
pub mod report;

// Re-export key types for convenience
pub use config::SbflConfig;
pub use error::{CoverageError, LocalizationError};
pub use localization::{
    compute_suspiciousness, invert, rank_of, ranking, score_of, CoverageMatrix, FailedTests,
    LineCoverageIndex, LineId, LineSpectrum, OchiaiScorer, RankedLine, SuspiciousnessMap, TestId,
};
pub use report::{LocalizationReport, ReportFormat};
