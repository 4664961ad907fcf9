use crate::alerts::alert::{Alert, AlertKind};
use crate::alerts::thresholds::{Level, Threshold};
use anyhow::Result;

/// A set-point with a warning and an alert band around it.
#[derive(Debug, Clone)]
pub struct MonitoredValue {
    setpoint: f64,
    kind: AlertKind,
    warning: Threshold,
    alert: Threshold,
}

impl MonitoredValue {
    /// Default bands: warning at +-10%, alert at +-20% of the set-point.
    pub fn new(setpoint: f64, kind: AlertKind) -> Self {
        Self {
            setpoint,
            kind,
            warning: Threshold::fraction(0.10, 0.10, Level::Warning),
            alert: Threshold::fraction(0.20, 0.20, Level::Alert),
        }
    }

    pub fn with_thresholds(
        setpoint: f64,
        kind: AlertKind,
        warning: Threshold,
        alert: Threshold,
    ) -> Self {
        Self {
            setpoint,
            kind,
            warning,
            alert,
        }
    }

    /// Build from optional spec strings ("3", "10%", "3:5"); a missing spec
    /// falls back to the fractional defaults.
    pub fn from_spec(
        setpoint: f64,
        kind: AlertKind,
        warn: Option<&str>,
        alert: Option<&str>,
    ) -> Result<Self> {
        let defaults = Self::new(setpoint, kind);
        let warning = match warn {
            Some(spec) => Threshold::parse(spec, Level::Warning)?,
            None => defaults.warning,
        };
        let alert = match alert {
            Some(spec) => Threshold::parse(spec, Level::Alert)?,
            None => defaults.alert,
        };
        Ok(Self {
            setpoint,
            kind,
            warning,
            alert,
        })
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn warning(&self) -> &Threshold {
        &self.warning
    }

    pub fn alert(&self) -> &Threshold {
        &self.alert
    }

    /// Evaluate a reading against both bands independently. Lazy and
    /// restartable: each call walks warning then alert, emitting an alert
    /// for every violated band — zero, one, or both may fire.
    pub fn triggers(&self, reading: f64) -> impl Iterator<Item = Alert> + '_ {
        [&self.warning, &self.alert]
            .into_iter()
            .filter(move |threshold| threshold.violated(reading, self.setpoint))
            .map(move |threshold| Alert::record(*threshold, reading, self.setpoint, self.kind))
    }
}
