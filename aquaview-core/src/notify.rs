//! Notification surface the session forwards alerts to.

use aquaview_schemas::alert::{AlertNotification, Severity};

/// Where alert notifications go. Implementations must tolerate being called
/// from the session worker thread.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, alert: &AlertNotification);
}

/// Default sink: routes alerts to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, alert: &AlertNotification) {
        match alert.severity {
            Severity::Warning => log::warn!("{}: {}", alert.title, alert.message),
            Severity::Critical => log::error!("{}: {}", alert.title, alert.message),
        }
    }
}
