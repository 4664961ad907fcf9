use crate::alerts::alert::AlertKind;
use crate::alerts::state::MonitorPolicy;
use crate::sensors::{MonitoredValue, Sensor};
use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub monitoring: MonitoringConfig,
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub expiry_window_minutes: u32,
    pub warning_count: usize,
    pub alert_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub recipients: Vec<String>,
}

/// One sensor entry. Threshold specs are strings: a bare number is an
/// absolute symmetric band, "10%" a fractional one, "3:5" an asymmetric
/// lower:upper pair. Omitted specs use the incubator defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub temperature_warning: Option<String>,
    pub temperature_alert: Option<String>,
    pub humidity_warning: Option<String>,
    pub humidity_alert: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitoring: MonitoringConfig {
                expiry_window_minutes: 30,
                warning_count: 2,
                alert_count: 1,
            },
            notifications: NotificationConfig {
                enabled: true,
                recipients: Vec::new(),
            },
            sensors: vec![SensorConfig {
                name: "Incubator".to_string(),
                temperature: Some(25.0),
                humidity: Some(50.0),
                temperature_warning: None,
                temperature_alert: None,
                humidity_warning: None,
                humidity_alert: None,
            }],
        }
    }
}

impl MonitoringConfig {
    pub fn policy(&self) -> MonitorPolicy {
        MonitorPolicy {
            expiry: Duration::minutes(self.expiry_window_minutes as i64),
            warning_count: self.warning_count,
            alert_count: self.alert_count,
        }
    }
}

impl SensorConfig {
    /// Build the runtime sensor. A present set-point enables the capability;
    /// threshold overrides fall back to the stock incubator bands
    /// (temperature warn 3 / alert 5, humidity warn 10 / alert 20).
    pub fn build(&self) -> Result<Sensor> {
        let mut sensor = Sensor::new(&self.name);
        if let Some(setpoint) = self.temperature {
            let value = MonitoredValue::from_spec(
                setpoint,
                AlertKind::Temperature,
                Some(self.temperature_warning.as_deref().unwrap_or("3")),
                Some(self.temperature_alert.as_deref().unwrap_or("5")),
            )
            .with_context(|| format!("invalid temperature thresholds for '{}'", self.name))?;
            sensor = sensor.with_temperature(value);
        }
        if let Some(setpoint) = self.humidity {
            let value = MonitoredValue::from_spec(
                setpoint,
                AlertKind::Humidity,
                Some(self.humidity_warning.as_deref().unwrap_or("10")),
                Some(self.humidity_alert.as_deref().unwrap_or("20")),
            )
            .with_context(|| format!("invalid humidity thresholds for '{}'", self.name))?;
            sensor = sensor.with_humidity(value);
        }
        Ok(sensor)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from an explicit path, or from the default location. A missing
    /// default config is created; a missing explicit path is an error.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_path(Path::new(path)),
            None => {
                let config_path = Self::default_path()?;
                if !config_path.exists() {
                    let config = Self::default();
                    config.save()?;
                    return Ok(config);
                }
                Self::load_path(&config_path)
            }
        }
    }

    fn load_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_path(&Self::default_path()?)
    }

    pub fn save_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = self.to_commented_toml()?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate TOML configuration with comments explaining the options
    pub fn to_commented_toml(&self) -> Result<String> {
        let mut output = String::new();

        output.push_str("# incmon Configuration File\n");
        output.push_str("# Incubator Environment Monitor - Configuration Options\n");
        output.push_str("\n");
        output.push_str("[monitoring]\n");
        output.push_str("# Minutes an alert stays in the active window before it is archived\n");
        output.push_str(&format!(
            "expiry_window_minutes = {}\n",
            self.monitoring.expiry_window_minutes
        ));
        output.push_str("# Un-notified warnings needed before a notification fires\n");
        output.push_str(&format!("warning_count = {}\n", self.monitoring.warning_count));
        output.push_str("# Un-notified alert-level violations needed before a notification fires\n");
        output.push_str(&format!("alert_count = {}\n", self.monitoring.alert_count));
        output.push_str("\n");
        output.push_str("[notifications]\n");
        output.push_str("# Enable desktop notifications\n");
        output.push_str(&format!("enabled = {}\n", self.notifications.enabled));
        output.push_str("# Contacts listed in notification messages\n");
        output.push_str(&format!(
            "recipients = [{}]\n",
            self.notifications
                .recipients
                .iter()
                .map(|r| format!("\"{}\"", r))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str("\n");
        output.push_str("# One [[sensors]] block per monitored incubator.\n");
        output.push_str("# Set-points enable a capability; threshold specs are \"3\", \"10%\"\n");
        output.push_str("# or asymmetric \"lower:upper\" pairs. Omitted specs use the stock\n");
        output.push_str("# bands (temperature 3/5, humidity 10/20).\n");
        for sensor in &self.sensors {
            output.push_str("\n[[sensors]]\n");
            output.push_str(&format!("name = \"{}\"\n", sensor.name));
            if let Some(t) = sensor.temperature {
                output.push_str(&format!("temperature = {t}\n"));
            }
            if let Some(h) = sensor.humidity {
                output.push_str(&format!("humidity = {h}\n"));
            }
            for (key, spec) in [
                ("temperature_warning", &sensor.temperature_warning),
                ("temperature_alert", &sensor.temperature_alert),
                ("humidity_warning", &sensor.humidity_warning),
                ("humidity_alert", &sensor.humidity_alert),
            ] {
                if let Some(spec) = spec {
                    output.push_str(&format!("{key} = \"{spec}\"\n"));
                }
            }
        }

        Ok(output)
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".config").join("incmon").join("config.toml"))
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "monitoring.expiry_window_minutes" => {
                self.monitoring.expiry_window_minutes = value
                    .parse()
                    .with_context(|| format!("Invalid minutes value: {}", value))?;
            }
            "monitoring.warning_count" => {
                self.monitoring.warning_count = value
                    .parse()
                    .with_context(|| format!("Invalid count value: {}", value))?;
            }
            "monitoring.alert_count" => {
                self.monitoring.alert_count = value
                    .parse()
                    .with_context(|| format!("Invalid count value: {}", value))?;
            }
            "notifications.enabled" => {
                self.notifications.enabled = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {}", value))?;
            }
            "notifications.recipients" => {
                self.notifications.recipients = value
                    .split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect();
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_sensors() {
        let config = Config::default();
        assert_eq!(config.sensors.len(), 1);
        let sensor = config.sensors[0].build().unwrap();
        assert_eq!(sensor.name(), "Incubator");
        assert!(sensor.monitored("temperature").is_ok());
        assert!(sensor.monitored("humidity").is_ok());
    }

    #[test]
    fn test_sensor_without_humidity_setpoint() {
        let sensor_config = SensorConfig {
            name: "dry".to_string(),
            temperature: Some(30.0),
            humidity: None,
            temperature_warning: None,
            temperature_alert: None,
            humidity_warning: None,
            humidity_alert: None,
        };
        let sensor = sensor_config.build().unwrap();
        assert!(sensor.monitored("temperature").is_ok());
        assert!(sensor.monitored("humidity").is_err());
    }

    #[test]
    fn test_threshold_override_round_trip() {
        let mut config = Config::default();
        config.sensors[0].temperature_warning = Some("10%".to_string());
        config.sensors[0].humidity_alert = Some("15:25".to_string());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        config.save_path(&path).unwrap();

        let loaded = Config::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.sensors[0].temperature_warning.as_deref(), Some("10%"));
        assert_eq!(loaded.sensors[0].humidity_alert.as_deref(), Some("15:25"));
        assert!(loaded.sensors[0].build().is_ok());
    }

    #[test]
    fn test_bad_threshold_spec_fails_at_build() {
        let mut config = Config::default();
        config.sensors[0].temperature_warning = Some("hot".to_string());
        assert!(config.sensors[0].build().is_err());
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("monitoring.warning_count", "5").unwrap();
        assert_eq!(config.monitoring.warning_count, 5);

        config.set_value("notifications.enabled", "false").unwrap();
        assert!(!config.notifications.enabled);

        config
            .set_value("notifications.recipients", "a@example.org, b@example.org")
            .unwrap();
        assert_eq!(config.notifications.recipients.len(), 2);

        assert!(config.set_value("monitoring.warning_count", "lots").is_err());
        assert!(config.set_value("unknown.key", "1").is_err());
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config::default();
        let policy = config.monitoring.policy();
        assert_eq!(policy.expiry, Duration::minutes(30));
        assert_eq!(policy.warning_count, 2);
        assert_eq!(policy.alert_count, 1);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        assert!(Config::load_from(Some("/nonexistent/incmon.toml")).is_err());
    }
}
