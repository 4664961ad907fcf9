use crate::alerts::thresholds::{Level, Threshold};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which monitored feature an alert belongs to. The kind is an explicit tag
/// on every alert so repeated violations can be matched into the right
/// per-kind state without inspecting anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Temperature,
    Humidity,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Temperature => "temperature",
            AlertKind::Humidity => "humidity",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "temperature" => Ok(AlertKind::Temperature),
            "humidity" => Ok(AlertKind::Humidity),
            other => bail!(
                "unknown alert kind '{}' (expected temperature or humidity)",
                other
            ),
        }
    }
}

/// Immutable record of one threshold violation.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    timestamp: DateTime<Utc>,
    threshold: Threshold,
    value: f64,
    setpoint: f64,
    kind: AlertKind,
}

impl Alert {
    /// Fails when the triple does not actually violate the threshold;
    /// production alerts are only ever built by `MonitoredValue::triggers`.
    pub fn new(threshold: Threshold, value: f64, setpoint: f64, kind: AlertKind) -> Result<Self> {
        if !threshold.violated(value, setpoint) {
            bail!(
                "reading {} is within the {} band around set-point {}",
                value,
                threshold.level(),
                setpoint
            );
        }
        Ok(Self::record(threshold, value, setpoint, kind))
    }

    /// Caller must have checked `threshold.violated(value, setpoint)`.
    pub(crate) fn record(threshold: Threshold, value: f64, setpoint: f64, kind: AlertKind) -> Self {
        debug_assert!(threshold.violated(value, setpoint));
        Self {
            timestamp: Utc::now(),
            threshold,
            value,
            setpoint,
            kind,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.threshold.level()
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: chrono::Duration) {
        self.timestamp -= by;
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: reading {} against set-point {} at {}",
            self.kind,
            self.level(),
            self.value,
            self.setpoint,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
