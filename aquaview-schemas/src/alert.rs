use crate::sample::Parameter;
use serde::{Deserialize, Serialize};

/// How urgent an alert is. Range drift on temperature, pH or turbidity is a
/// warning; oxygen starvation and heavy-metal contamination are critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

/// One threshold breach, produced by the evaluator and handed straight to a
/// notification surface. Not stored anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertNotification {
    pub parameter: Parameter,
    pub severity: Severity,
    pub title: String,
    pub message: String,
}
