use crate::alerts::handler::Notifier;
use crate::alerts::state::AlertState;
use crate::alerts::thresholds::Level;
use anyhow::{Context, Result};
use notify_rust::{Notification, Timeout, Urgency};

/// Desktop notification transport. Recipients from the configuration ride
/// along in the message body; actual SMS/email fan-out is out of scope.
pub struct NotificationHandler {
    enabled: bool,
    recipients: Vec<String>,
}

impl NotificationHandler {
    pub fn new(enabled: bool, recipients: Vec<String>) -> Self {
        Self {
            enabled,
            recipients,
        }
    }

    pub fn send_test_notification(&self) -> Result<()> {
        if !self.enabled {
            return Err(anyhow::anyhow!("desktop notifications are disabled"));
        }

        Notification::new()
            .summary("incmon Alert System Test")
            .body("Desktop notifications are working correctly! You'll receive alerts when sensor readings leave their bands.")
            .timeout(Timeout::Milliseconds(5000))
            .urgency(Urgency::Normal)
            .appname("incmon")
            .icon("dialog-information")
            .show()
            .context("Failed to show test notification")?;

        Ok(())
    }

    pub fn is_available() -> bool {
        // Check if the system supports desktop notifications
        #[cfg(target_os = "linux")]
        {
            std::env::var("DISPLAY").is_ok() || std::env::var("WAYLAND_DISPLAY").is_ok()
        }

        #[cfg(target_os = "macos")]
        {
            true
        }

        #[cfg(target_os = "windows")]
        {
            true
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            false
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Notifier for NotificationHandler {
    fn notify(&self, state: &AlertState) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let (timeout, urgency) = match state.severity() {
            Level::Alert => (Timeout::Never, Urgency::Critical),
            Level::Warning => (Timeout::Milliseconds(10000), Urgency::Normal),
            Level::Notify => (Timeout::Milliseconds(7000), Urgency::Normal),
            Level::Info => (Timeout::Milliseconds(5000), Urgency::Low),
        };

        let icon = match state.severity() {
            Level::Alert | Level::Warning => "dialog-warning",
            Level::Notify | Level::Info => "dialog-information",
        };

        let mut body = state.message();
        if !self.recipients.is_empty() {
            body.push_str(&format!(" Notifying: {}.", self.recipients.join(", ")));
        }

        Notification::new()
            .summary(&state.title())
            .body(&body)
            .timeout(timeout)
            .urgency(urgency)
            .appname("incmon")
            .icon(icon)
            .show()
            .context("Failed to show desktop notification")?;

        Ok(())
    }
}

impl Default for NotificationHandler {
    fn default() -> Self {
        Self::new(Self::is_available(), Vec::new())
    }
}
