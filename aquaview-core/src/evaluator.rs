//! Threshold evaluation for a single sample.
//!
//! Pure: same (sample, thresholds) pair, same notifications. All six rules
//! run on every call; a reading that breaches several bounds produces one
//! notification per breach.

use aquaview_schemas::{
    alert::{AlertNotification, Severity},
    sample::{Parameter, Sample},
    settings::AlertThresholds,
};

/// Compare one sample against the configured bounds.
pub fn evaluate(sample: &Sample, thresholds: &AlertThresholds) -> Vec<AlertNotification> {
    let mut alerts = Vec::new();

    if sample.ph < thresholds.ph.min || sample.ph > thresholds.ph.max {
        alerts.push(AlertNotification {
            parameter: Parameter::Ph,
            severity: Severity::Warning,
            title: "pH Alert".to_string(),
            message: format!(
                "pH level is {}, outside the normal range of {}-{}.",
                sample.ph, thresholds.ph.min, thresholds.ph.max
            ),
        });
    }

    if sample.turbidity > thresholds.turbidity.max {
        alerts.push(AlertNotification {
            parameter: Parameter::Turbidity,
            severity: Severity::Warning,
            title: "Turbidity Alert".to_string(),
            message: format!(
                "Turbidity is {} NTU, above the {} NTU limit.",
                sample.turbidity, thresholds.turbidity.max
            ),
        });
    }

    if sample.temp < thresholds.temp.min || sample.temp > thresholds.temp.max {
        alerts.push(AlertNotification {
            parameter: Parameter::Temp,
            severity: Severity::Warning,
            title: "Temperature Alert".to_string(),
            message: format!(
                "Temperature is {}°C, outside the safe range of {}-{}°C.",
                sample.temp, thresholds.temp.min, thresholds.temp.max
            ),
        });
    }

    if sample.dissolved_oxygen < thresholds.dissolved_oxygen.min {
        alerts.push(AlertNotification {
            parameter: Parameter::DissolvedOxygen,
            severity: Severity::Critical,
            title: "Oxygen Alert".to_string(),
            message: format!(
                "Dissolved oxygen is {} mg/L, below the {} mg/L minimum.",
                sample.dissolved_oxygen, thresholds.dissolved_oxygen.min
            ),
        });
    }

    if sample.lead > thresholds.lead.max {
        alerts.push(AlertNotification {
            parameter: Parameter::Lead,
            severity: Severity::Critical,
            title: "Lead Alert".to_string(),
            message: format!(
                "Lead concentration is {} mg/L, exceeding the {} mg/L safe limit.",
                sample.lead, thresholds.lead.max
            ),
        });
    }

    if sample.copper > thresholds.copper.max {
        alerts.push(AlertNotification {
            parameter: Parameter::Copper,
            severity: Severity::Critical,
            title: "Copper Alert".to_string(),
            message: format!(
                "Copper concentration is {} mg/L, exceeding the {} mg/L safe limit.",
                sample.copper, thresholds.copper.max
            ),
        });
    }

    alerts
}
