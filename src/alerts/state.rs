use crate::alerts::alert::{Alert, AlertKind};
use crate::alerts::thresholds::Level;
use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Caller-supplied knobs for the alert lifecycle: how long a violation stays
/// in the active window, and how many un-notified violations must accumulate
/// before a notification fires.
#[derive(Debug, Clone, Copy)]
pub struct MonitorPolicy {
    pub expiry: Duration,
    pub warning_count: usize,
    pub alert_count: usize,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            expiry: Duration::minutes(30),
            warning_count: 2,
            alert_count: 1,
        }
    }
}

/// Aggregate of all alerts of one kind for one sensor.
///
/// Lifecycle, derived from the fields rather than stored: inactive
/// (`new_alerts` empty) -> active-unnotified (`notified_at` none) ->
/// active-notified (`notified_at` set), re-armed to active-unnotified when a
/// strictly more severe alert arrives. Severity is computed over new and
/// archived alerts together, so it never de-escalates while the state lives.
#[derive(Debug, Clone)]
pub struct AlertState {
    sensor: String,
    kind: AlertKind,
    expiry: Duration,
    new_alerts: Vec<Alert>,
    archived: Vec<Alert>,
    notified_at: Option<DateTime<Utc>>,
}

impl AlertState {
    /// A state starts with at least one alert; all alerts must share a kind.
    pub fn new(sensor: &str, expiry: Duration, alerts: Vec<Alert>) -> Result<Self> {
        let Some(first) = alerts.first() else {
            bail!("alert state for '{}' needs at least one alert", sensor);
        };
        let kind = first.kind();
        if alerts.iter().any(|a| a.kind() != kind) {
            bail!("mixed alert kinds in one state for '{}'", sensor);
        }
        Ok(Self {
            sensor: sensor.to_string(),
            kind,
            expiry,
            new_alerts: alerts,
            archived: Vec::new(),
            notified_at: None,
        })
    }

    /// Merge incoming alerts of this state's kind. An incoming alert strictly
    /// more severe than everything seen so far re-arms the notify gate.
    pub fn update(&mut self, incoming: Vec<Alert>) {
        let severity_before = self.severity();
        for alert in incoming {
            if alert.kind() != self.kind {
                continue;
            }
            if alert.level().index() < severity_before.index() {
                self.notified_at = None;
            }
            self.new_alerts.push(alert);
        }
        self.prune(Utc::now());
    }

    /// Move alerts older than the expiry window into the archive. Archived
    /// alerts still count toward severity but not toward the pending gate.
    /// Idempotent for a fixed `now`.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.expiry;
        let mut retained = Vec::with_capacity(self.new_alerts.len());
        for alert in self.new_alerts.drain(..) {
            if alert.timestamp() < cutoff {
                self.archived.push(alert);
            } else {
                retained.push(alert);
            }
        }
        self.new_alerts = retained;
    }

    /// The debounce gate: enough un-notified violations have accumulated in
    /// the active window to justify firing now.
    pub fn pending(&self, policy: &MonitorPolicy) -> bool {
        if self.notified_at.is_some() {
            return false;
        }
        let warnings = self.count_level(Level::Warning);
        let alerts = self.count_level(Level::Alert);
        warnings >= policy.warning_count || alerts >= policy.alert_count
    }

    pub fn active(&self) -> bool {
        !self.new_alerts.is_empty()
    }

    /// Most severe level across active and archived alerts. Sticky: archiving
    /// the contributing alert does not lower it.
    pub fn severity(&self) -> Level {
        self.new_alerts
            .iter()
            .chain(&self.archived)
            .map(|a| a.level())
            .min()
            .unwrap_or(Level::Info)
    }

    pub fn mark_notified(&mut self, now: DateTime<Utc>) {
        self.notified_at = Some(now);
    }

    pub fn sensor(&self) -> &str {
        &self.sensor
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn notified_at(&self) -> Option<DateTime<Utc>> {
        self.notified_at
    }

    pub fn new_alerts(&self) -> &[Alert] {
        &self.new_alerts
    }

    pub fn archived(&self) -> &[Alert] {
        &self.archived
    }

    /// Notification summary line.
    pub fn title(&self) -> String {
        format!("{}: {} {} deviation", self.sensor, self.severity(), self.kind)
    }

    /// Notification body.
    pub fn message(&self) -> String {
        let mut message = format!(
            "{} out-of-band {} reading(s) in the current window (severity: {}).",
            self.new_alerts.len(),
            self.kind,
            self.severity()
        );
        if let Some(last) = self.new_alerts.last().or_else(|| self.archived.last()) {
            message.push_str(&format!(
                " Last reading {:.1} against set-point {:.1}.",
                last.value(),
                last.setpoint()
            ));
        }
        message
    }

    fn count_level(&self, level: Level) -> usize {
        self.new_alerts.iter().filter(|a| a.level() == level).count()
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: severity {}, {} active, {} archived{}",
            self.sensor,
            self.kind,
            self.severity(),
            self.new_alerts.len(),
            self.archived.len(),
            if self.notified_at.is_some() {
                ", notified"
            } else {
                ""
            }
        )
    }
}
