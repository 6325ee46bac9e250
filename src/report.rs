//! Report generation for fault localization results

use crate::error::LocalizationError;
use crate::localization::{
    ranking, rank_of, score_of, CoverageMatrix, FailedTests, RankedLine, SuspiciousnessMap,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Localization report data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationReport {
    pub total_tests: usize,
    pub failed_tests: usize,
    pub scored_lines: usize,
    /// The line under investigation, if one was requested
    pub target: Option<RankedLine>,
    /// Most suspicious lines, best first
    pub top: Vec<RankedLine>,
}

impl LocalizationReport {
    pub fn new(matrix: &CoverageMatrix, failed: &FailedTests, scores: &SuspiciousnessMap) -> Self {
        Self {
            total_tests: matrix.len(),
            failed_tests: failed.len(),
            scored_lines: scores.len(),
            target: None,
            top: Vec::new(),
        }
    }

    /// Attach the score and rank of `line`.
    pub fn with_target(
        mut self,
        scores: &SuspiciousnessMap,
        line: &str,
    ) -> std::result::Result<Self, LocalizationError> {
        self.target = Some(RankedLine {
            line: line.to_string(),
            score: score_of(scores, line)?,
            rank: rank_of(scores, line)?,
        });
        Ok(self)
    }

    /// Attach the `n` most suspicious lines.
    pub fn with_top(mut self, scores: &SuspiciousnessMap, n: usize) -> Self {
        self.top = ranking(scores).into_iter().take(n).collect();
        self
    }

    /// Render in the requested format
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => self.to_json(),
            ReportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Generate JSON report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generate plain text report
    pub fn to_text(&self) -> String {
        let mut text = String::new();

        text.push_str("FAULT LOCALIZATION REPORT (Ochiai)\n");
        text.push_str(&"=".repeat(60));
        text.push_str("\n\n");

        text.push_str(&format!("Tests:        {}\n", self.total_tests));
        text.push_str(&format!("Failed tests: {}\n", self.failed_tests));
        text.push_str(&format!("Scored lines: {}\n", self.scored_lines));
        text.push('\n');

        if let Some(target) = &self.target {
            text.push_str("TARGET\n");
            text.push_str(&"-".repeat(60));
            text.push('\n');
            text.push_str(&format!("Line:  {}\n", target.line));
            text.push_str(&format!("Score: {:.4}\n", target.score));
            text.push_str(&format!(
                "Rank:  {} of {}\n",
                target.rank, self.scored_lines
            ));
            text.push('\n');
        }

        if !self.top.is_empty() {
            text.push_str("MOST SUSPICIOUS\n");
            text.push_str(&"-".repeat(60));
            text.push('\n');
            for entry in &self.top {
                text.push_str(&format!(
                    "{:>5}  {:.4}  {}\n",
                    entry.rank, entry.score, entry.line
                ));
            }
        }

        text
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
