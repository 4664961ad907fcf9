use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Severity levels in descending order of urgency. The derived `Ord` follows
/// declaration order, so `min()` over a set of levels yields the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Alert,
    Warning,
    Notify,
    Info,
}

impl Level {
    /// Severity index: 0 is most severe (alert), 3 least (info).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Alert => "alert",
            Level::Warning => "warning",
            Level::Notify => "notify",
            Level::Info => "info",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alert" => Ok(Level::Alert),
            "warning" => Ok(Level::Warning),
            "notify" => Ok(Level::Notify),
            "info" => Ok(Level::Info),
            other => bail!(
                "unknown severity level '{}' (expected alert, warning, notify or info)",
                other
            ),
        }
    }
}

/// Deviation band around a set-point. Absolute bounds are in the reading's
/// unit; fractional bounds are scaled by the set-point magnitude at
/// evaluation time ("10%" parses to 0.10).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Band {
    Absolute { lower: f64, upper: f64 },
    Fraction { lower: f64, upper: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    band: Band,
    level: Level,
}

impl Threshold {
    pub fn absolute(lower: f64, upper: f64, level: Level) -> Self {
        debug_assert!(lower >= 0.0 && upper >= 0.0);
        Self {
            band: Band::Absolute { lower, upper },
            level,
        }
    }

    pub fn fraction(lower: f64, upper: f64, level: Level) -> Self {
        debug_assert!(lower >= 0.0 && upper >= 0.0);
        Self {
            band: Band::Fraction { lower, upper },
            level,
        }
    }

    /// Parse a threshold spec string. A bare number ("3") is an absolute
    /// symmetric band, a percentage ("10%") a fractional one, and a
    /// colon-separated pair ("3:5", "10%:20%") an asymmetric lower:upper band.
    pub fn parse(spec: &str, level: Level) -> Result<Self> {
        let spec = spec.trim();
        let (lower, upper) = match spec.split_once(':') {
            Some((lo, hi)) => (lo.trim(), hi.trim()),
            None => (spec, spec),
        };

        if lower.ends_with('%') || upper.ends_with('%') {
            Ok(Self::fraction(
                percent_to_fraction(lower)?,
                percent_to_fraction(upper)?,
                level,
            ))
        } else {
            Ok(Self::absolute(
                parse_bound(lower)?,
                parse_bound(upper)?,
                level,
            ))
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// True when `value` falls outside the band around `setpoint`.
    /// Boundary values are in-band.
    pub fn violated(&self, value: f64, setpoint: f64) -> bool {
        let (lower, upper) = match self.band {
            Band::Absolute { lower, upper } => (lower, upper),
            Band::Fraction { lower, upper } => (setpoint.abs() * lower, setpoint.abs() * upper),
        };
        value > setpoint + upper || value < setpoint - lower
    }
}

fn parse_bound(s: &str) -> Result<f64> {
    let bound: f64 = s
        .parse()
        .with_context(|| format!("invalid threshold bound '{}'", s))?;
    if !bound.is_finite() || bound < 0.0 {
        bail!("threshold bound must be a non-negative number, got '{}'", s);
    }
    Ok(bound)
}

fn percent_to_fraction(s: &str) -> Result<f64> {
    let Some(number) = s.strip_suffix('%') else {
        bail!("expected a percentage like '10%', got '{}'", s);
    };
    let percent: f64 = number
        .trim()
        .parse()
        .with_context(|| format!("invalid percentage '{}'", s))?;
    if !percent.is_finite() || percent < 0.0 {
        bail!("percentage must be non-negative, got '{}'", s);
    }
    Ok(percent / 100.0)
}
