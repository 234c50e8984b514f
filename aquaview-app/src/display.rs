//! Terminal output formatting.

use aquaview_core::evaluator;
use aquaview_core::notify::NotificationSink;
use aquaview_schemas::alert::{AlertNotification, Severity};
use aquaview_schemas::analysis::{OverallStatus, WaterQualityAnalysis};
use aquaview_schemas::sample::{Parameter, Sample};
use aquaview_schemas::settings::{Settings, TempUnit};
use chrono::{DateTime, Local};
use colored::*;

/// Display welcome banner
pub fn welcome() {
    println!();
    println!("{}", "═".repeat(62).cyan());
    println!("{}", "  AQUAVIEW — Live Water-Quality Dashboard".bright_white().bold());
    println!("{}", "═".repeat(62).cyan());
    println!();
}

/// Render the current reading as parameter cards plus a short trend line.
pub fn dashboard(sample: &Sample, settings: &Settings, history: &[Sample]) {
    let breaches: Vec<Parameter> = evaluator::evaluate(sample, &settings.alerts)
        .iter()
        .map(|alert| alert.parameter)
        .collect();

    println!("{}", "─".repeat(62).bright_black());
    println!("{} {}", "Reading at".bright_black(), format_local(sample.time).white());
    for parameter in Parameter::ALL {
        let value = display_value(sample, parameter, settings);
        let line = format!(
            "  {:<18} {:>10} {}",
            parameter.to_string(),
            value,
            display_unit(parameter, settings)
        );
        if breaches.contains(&parameter) {
            println!("{} {}", line.red().bold(), "⚠".red());
        } else {
            println!("{}", line.green());
        }
    }
    println!(
        "  {:<18} {}",
        "Temp trend".bright_black(),
        sparkline(history, Parameter::Temp).bright_black()
    );
}

/// Render the analyst's structured verdict.
pub fn analysis(analysis: &WaterQualityAnalysis) {
    let status = match analysis.overall_status {
        OverallStatus::Good => analysis.overall_status.to_string().green().bold(),
        OverallStatus::Warning => analysis.overall_status.to_string().yellow().bold(),
        OverallStatus::Critical => analysis.overall_status.to_string().red().bold(),
    };
    println!();
    println!("{} {}", "Overall status:".bright_white(), status);
    println!("{}", analysis.summary.white());
    for section in &analysis.detailed_analysis {
        println!();
        println!("{}", section.title.bright_white().bold());
        for point in &section.points {
            println!("  • {}", point);
        }
    }
}

/// Toast-style notification surface: one colored line per alert on stderr.
#[derive(Debug, Default)]
pub struct ToastSink;

impl NotificationSink for ToastSink {
    fn notify(&self, alert: &AlertNotification) {
        let title = match alert.severity {
            Severity::Warning => alert.title.yellow().bold(),
            Severity::Critical => alert.title.red().bold(),
        };
        eprintln!("{} {}", title, alert.message);
    }
}

fn display_value(sample: &Sample, parameter: Parameter, settings: &Settings) -> String {
    let value = sample.value(parameter);
    match parameter {
        Parameter::Temp => match settings.units.temp {
            TempUnit::C => format!("{:.1}", value),
            TempUnit::F => format!("{:.1}", value * 9.0 / 5.0 + 32.0),
        },
        Parameter::Ph | Parameter::DissolvedOxygen => format!("{:.1}", value),
        Parameter::Turbidity => format!("{:.0}", value),
        Parameter::Lead => format!("{:.4}", value),
        Parameter::Copper => format!("{:.3}", value),
    }
}

fn display_unit(parameter: Parameter, settings: &Settings) -> &'static str {
    if parameter == Parameter::Temp && settings.units.temp == TempUnit::F {
        return "°F";
    }
    parameter.unit()
}

fn format_local(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn sparkline(history: &[Sample], parameter: Parameter) -> String {
    let values: Vec<f64> = history.iter().map(|s| s.value(parameter)).collect();
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return String::new();
    };
    let span = (max - min).max(f64::EPSILON);
    values
        .iter()
        .map(|v| {
            let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaview_core::generator::BASELINE;

    #[test]
    fn fahrenheit_conversion_is_display_only() {
        let mut settings = Settings::default();
        settings.units.temp = TempUnit::F;
        assert_eq!(display_value(&BASELINE, Parameter::Temp, &settings), "77.0");
        assert_eq!(display_unit(Parameter::Temp, &settings), "°F");
    }

    #[test]
    fn sparkline_spans_the_levels() {
        let mut low = BASELINE;
        low.temp = 10.0;
        let mut high = BASELINE;
        high.temp = 40.0;
        let line = sparkline(&[low, high], Parameter::Temp);
        assert_eq!(line.chars().count(), 2);
        assert_ne!(line.chars().next(), line.chars().nth(1));
    }
}
