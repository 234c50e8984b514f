//! Exchange types for the external LLM analyst.
//!
//! The analyst is an opaque collaborator: the core ships it a snapshot and
//! renders whatever comes back. These shapes only pin down the JSON the
//! model is asked to produce; nothing here validates its judgment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall water-quality verdict as judged by the analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Good,
    Warning,
    Critical,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallStatus::Good => f.write_str("Good"),
            OverallStatus::Warning => f.write_str("Warning"),
            OverallStatus::Critical => f.write_str("Critical"),
        }
    }
}

/// One titled section of the detailed analysis, e.g. "Key Observations".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    pub points: Vec<String>,
}

/// Structured verdict for the current reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterQualityAnalysis {
    pub overall_status: OverallStatus,
    pub summary: String,
    pub detailed_analysis: Vec<AnalysisSection>,
}

/// Free-text report over a history window, markdown-structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQualityReport {
    pub report: String,
}
