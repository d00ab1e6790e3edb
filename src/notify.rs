//! User-facing failure notifications.

use std::io::Write;
use std::sync::Mutex;

pub const LOCATION_ALERT: &str = "Could not get your location. Try enabling location services.";
pub const CONNECTION_ALERT: &str = "Could not connect to site. Try again later.";

/// Shows a blocking message to the user.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr, outside the log stream, so they reach the user
/// whatever the log filter is.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
    }
}

/// Keeps every alert in memory; used where alerts are inspected afterwards.
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}
