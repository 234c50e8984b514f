//! Hosted-LLM analyst client.
//!
//! The analyst is an opaque external collaborator: we ship it a snapshot of
//! the readings and thresholds, and render whatever verdict comes back. Both
//! calls can fail (network, timeout, unparseable output) and the caller is
//! expected to surface that as an error state without touching the
//! simulation session.

use anyhow::{anyhow, Context, Result};
use aquaview_schemas::analysis::WaterQualityAnalysis;
use aquaview_schemas::sample::Sample;
use aquaview_schemas::settings::Settings;
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::config::AnalystArgs;

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

const SYSTEM_PROMPT: &str = "You are AquaGuard, an AI assistant specializing in \
real-time water quality analysis for aquaculture. Your task is to provide clear, \
concise and actionable analysis of the provided sensor data.";

pub struct AnalystClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl AnalystClient {
    pub fn new(args: &AnalystArgs) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(args.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: args.api_key.clone(),
            endpoint: args.endpoint.clone(),
            model: args.model.clone(),
            max_tokens: args.max_tokens,
        })
    }

    /// Structured verdict on the current reading.
    pub async fn analyze(
        &self,
        current: &Sample,
        settings: &Settings,
    ) -> Result<WaterQualityAnalysis> {
        let text = self.send(analysis_prompt(current, settings)).await?;
        let json = extract_json(&text)
            .ok_or_else(|| anyhow!("analyst reply contained no JSON object: {}", text))?;
        serde_json::from_str(json).context("analyst returned malformed analysis JSON")
    }

    /// Free-text markdown report over the given history window.
    pub async fn report(&self, history: &[Sample], settings: &Settings) -> Result<String> {
        if history.is_empty() {
            anyhow::bail!("no history to report on");
        }
        let text = self.send(report_prompt(history, settings)).await?;
        Ok(text.trim().to_string())
    }

    async fn send(&self, prompt: String) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("analyst request failed")?;

        let status = response.status();
        let body = response.text().await.context("analyst reply unreadable")?;
        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(anyhow!("analyst error ({}): {}", status, err.error.message));
            }
            return Err(anyhow!("analyst error ({}): {}", status, body));
        }

        let response: MessagesResponse = serde_json::from_str(&body)
            .with_context(|| format!("failed to parse analyst reply: {}", body))?;
        let text = response
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            return Err(anyhow!("analyst produced no usable output"));
        }
        Ok(text)
    }
}

fn thresholds_block(settings: &Settings) -> String {
    let a = &settings.alerts;
    let mut block = String::new();
    let _ = writeln!(block, "- Temperature: {}-{}°C", a.temp.min, a.temp.max);
    let _ = writeln!(block, "- pH: {}-{}", a.ph.min, a.ph.max);
    let _ = writeln!(block, "- Turbidity: < {} NTU", a.turbidity.max);
    let _ = writeln!(block, "- Dissolved Oxygen: > {} mg/L", a.dissolved_oxygen.min);
    let _ = writeln!(block, "- Lead: < {} mg/L", a.lead.max);
    let _ = writeln!(block, "- Copper: < {} mg/L", a.copper.max);
    block
}

fn analysis_prompt(current: &Sample, settings: &Settings) -> String {
    format!(
        "Analyze the current sensor data against the alert thresholds.\n\n\
**Current Sensor Data:**\n\
- Temperature: {}°C\n\
- pH: {}\n\
- Turbidity: {} NTU\n\
- Dissolved Oxygen (DO): {} mg/L\n\
- Lead: {} mg/L\n\
- Copper: {} mg/L\n\n\
**Alert Thresholds (Optimal Ranges):**\n{}\n\
Respond with a single JSON object and nothing else, shaped exactly like:\n\
{{\"overallStatus\": \"Good\" | \"Warning\" | \"Critical\", \"summary\": \"one sentence\", \
\"detailedAnalysis\": [{{\"title\": \"Key Observations\", \"points\": [\"...\"]}}, \
{{\"title\": \"Actionable Recommendations\", \"points\": [\"...\"]}}]}}\n\n\
'Good' means all parameters are within optimal ranges; 'Warning' means one or more \
are slightly outside; 'Critical' means a parameter is at a dangerous level requiring \
immediate attention. Be specific about which parameters are normal and which breach \
their thresholds, and keep recommendations simple and actionable.",
        current.temp,
        current.ph,
        current.turbidity,
        current.dissolved_oxygen,
        current.lead,
        current.copper,
        thresholds_block(settings),
    )
}

fn report_prompt(history: &[Sample], settings: &Settings) -> String {
    let mut lines = String::new();
    for sample in history {
        let _ = writeln!(
            lines,
            "- [{}] Temp: {}°C, pH: {}, Turbidity: {} NTU, DO: {} mg/L, Lead: {} mg/L, Copper: {} mg/L",
            format_time(sample.time),
            sample.temp,
            sample.ph,
            sample.turbidity,
            sample.dissolved_oxygen,
            sample.lead,
            sample.copper,
        );
    }

    format!(
        "Generate a comprehensive, professional water-quality report for the data below. \
Format it as a single block of text using markdown.\n\n\
**Analysis Period:** {} to {}\n\n\
**Alert Thresholds (Optimal Ranges):**\n{}\n\
**Data Summary:**\n{}\n\
The report must contain these markdown sections:\n\
# AquaView Water Quality Report (with the date range)\n\
## 1. Executive Summary (overall assessment, consistent threshold breaches)\n\
## 2. Detailed Parameter Analysis (one '###' subsection per parameter with trend, \
violations and average value)\n\
## 3. Key Events & Anomalies (spikes, drops, correlations; or state that parameters were stable)\n\
## 4. Recommendations (specific actions, or continue current practices)\n\n\
Output only the report text.",
        format_time(history[0].time),
        format_time(history[history.len() - 1].time),
        thresholds_block(settings),
        lines,
    )
}

fn format_time(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// First balanced JSON object in `text`, tolerating prose around it.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaview_core::generator::BASELINE;

    #[test]
    fn analysis_prompt_carries_readings_and_bounds() {
        let prompt = analysis_prompt(&BASELINE, &Settings::default());
        assert!(prompt.contains("Temperature: 25°C"));
        assert!(prompt.contains("- pH: 6.5-8.5"));
        assert!(prompt.contains("Lead: < 0.015 mg/L"));
        assert!(prompt.contains("overallStatus"));
    }

    #[test]
    fn report_prompt_formats_timestamps() {
        let mut sample = BASELINE;
        sample.time = 1_700_000_000_000;
        let prompt = report_prompt(&[sample], &Settings::default());
        assert!(prompt.contains("2023-11-14"));
        assert!(prompt.contains("## 2. Detailed Parameter Analysis"));
    }

    #[test]
    fn extract_json_skips_surrounding_prose() {
        let text = "Here is the analysis:\n{\"overallStatus\": \"Good\", \"note\": \"{braces} in strings\"}\nHope that helps.";
        let json = extract_json(text).unwrap();
        assert!(json.starts_with('{') && json.ends_with('}'));
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["overallStatus"], "Good");
    }

    #[test]
    fn extract_json_handles_nesting() {
        let text = "{\"a\": {\"b\": [1, 2]}} trailing";
        assert_eq!(extract_json(text), Some("{\"a\": {\"b\": [1, 2]}}"));
    }
}
