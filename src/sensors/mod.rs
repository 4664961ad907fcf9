pub mod monitored;

pub use monitored::MonitoredValue;

use crate::alerts::alert::AlertKind;
use crate::alerts::thresholds::{Level, Threshold};
use anyhow::{Result, bail};
use std::fmt;

/// A physical entity with optional monitored capabilities and a display name.
/// The alert engine reaches capabilities only through the name-keyed
/// `monitored` lookup.
#[derive(Debug, Clone)]
pub struct Sensor {
    name: String,
    temperature: Option<MonitoredValue>,
    humidity: Option<MonitoredValue>,
}

impl Sensor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            temperature: None,
            humidity: None,
        }
    }

    /// Stock incubator profile: temperature 25 (warn +-3, alert +-5),
    /// humidity 50 (warn +-10, alert +-20).
    pub fn incubator(name: &str) -> Self {
        Self::new(name)
            .with_temperature(MonitoredValue::with_thresholds(
                25.0,
                AlertKind::Temperature,
                Threshold::absolute(3.0, 3.0, Level::Warning),
                Threshold::absolute(5.0, 5.0, Level::Alert),
            ))
            .with_humidity(MonitoredValue::with_thresholds(
                50.0,
                AlertKind::Humidity,
                Threshold::absolute(10.0, 10.0, Level::Warning),
                Threshold::absolute(20.0, 20.0, Level::Alert),
            ))
    }

    pub fn with_temperature(mut self, value: MonitoredValue) -> Self {
        self.temperature = Some(value);
        self
    }

    pub fn with_humidity(mut self, value: MonitoredValue) -> Self {
        self.humidity = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> Option<&MonitoredValue> {
        self.temperature.as_ref()
    }

    pub fn humidity(&self) -> Option<&MonitoredValue> {
        self.humidity.as_ref()
    }

    /// Resolve a feature name to its monitored value. A name this sensor has
    /// no capability for is a missing-capability error.
    pub fn monitored(&self, feature: &str) -> Result<&MonitoredValue> {
        let capability = match feature {
            "temperature" => self.temperature.as_ref(),
            "humidity" => self.humidity.as_ref(),
            _ => None,
        };
        match capability {
            Some(value) => Ok(value),
            None => bail!("sensor '{}' has no '{}' capability", self.name, feature),
        }
    }

    /// Feature names this sensor can be asked about.
    pub fn features(&self) -> Vec<&'static str> {
        let mut features = Vec::new();
        if self.temperature.is_some() {
            features.push("temperature");
        }
        if self.humidity.is_some() {
            features.push("humidity");
        }
        features
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(t) = &self.temperature {
            write!(f, ", temperature: {}", t.setpoint())?;
        }
        if let Some(h) = &self.humidity {
            write!(f, ", humidity: {}", h.setpoint())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitored_lookup() {
        let sensor = Sensor::incubator("Incubator 1");
        assert!(sensor.monitored("temperature").is_ok());
        assert!(sensor.monitored("humidity").is_ok());
        assert_eq!(sensor.features(), vec!["temperature", "humidity"]);
    }

    #[test]
    fn test_missing_capability_is_an_error() {
        let sensor = Sensor::new("bare").with_temperature(MonitoredValue::new(
            25.0,
            AlertKind::Temperature,
        ));
        assert!(sensor.monitored("humidity").is_err());
        assert!(sensor.monitored("pressure").is_err());
        let message = sensor.monitored("pressure").unwrap_err().to_string();
        assert!(message.contains("bare"));
        assert!(message.contains("pressure"));
    }

    #[test]
    fn test_incubator_profile_bands() {
        let sensor = Sensor::incubator("Incubator 1");
        let temperature = sensor.monitored("temperature").unwrap();
        assert_eq!(temperature.setpoint(), 25.0);
        assert_eq!(temperature.triggers(29.0).count(), 1);
        let humidity = sensor.monitored("humidity").unwrap();
        assert_eq!(humidity.setpoint(), 50.0);
        assert_eq!(humidity.triggers(59.0).count(), 0);
    }

    #[test]
    fn test_display_identity() {
        let sensor = Sensor::incubator("Hatchery A");
        assert_eq!(format!("{sensor}"), "Hatchery A, temperature: 25, humidity: 50");
    }
}
