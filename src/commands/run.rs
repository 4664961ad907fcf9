use crate::alerts::{AlertHandler, NotificationHandler};
use crate::config::Config;
use crate::sensors::Sensor;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// One line of ingested input:
/// `{"sensor": "Incubator", "readings": {"temperature": 29.0}}`
#[derive(Debug, Deserialize)]
pub struct Reading {
    pub sensor: String,
    pub readings: HashMap<String, f64>,
}

pub fn handle_run_command(config: &Config, input: Option<&str>, verbose: bool) -> Result<()> {
    let sensors = build_sensors(config)?;
    let notifier = NotificationHandler::new(
        config.notifications.enabled,
        config.notifications.recipients.clone(),
    );
    let mut handler = AlertHandler::new(config.monitoring.policy(), notifier);

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input file: {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        if line.trim().is_empty() {
            continue;
        }
        // a bad line or a bad reading must not stall the stream
        if let Err(e) = process_line(&line, &sensors, &mut handler, verbose) {
            eprintln!("Error: {e:#}");
        }
    }

    Ok(())
}

fn build_sensors(config: &Config) -> Result<HashMap<String, Sensor>> {
    config
        .sensors
        .iter()
        .map(|entry| entry.build().map(|s| (s.name().to_string(), s)))
        .collect()
}

fn process_line(
    line: &str,
    sensors: &HashMap<String, Sensor>,
    handler: &mut AlertHandler<NotificationHandler>,
    verbose: bool,
) -> Result<()> {
    let reading: Reading = serde_json::from_str(line).context("invalid reading line")?;
    let sensor = sensors
        .get(&reading.sensor)
        .with_context(|| format!("unknown sensor: '{}'", reading.sensor))?;

    handler.handle(sensor, &reading.readings)?;

    if verbose {
        let states = handler.states(sensor.name());
        if states.is_empty() {
            println!("{}: all readings in band", sensor.name());
        }
        for state in states {
            println!("{state}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_line_parses() {
        let reading: Reading =
            serde_json::from_str(r#"{"sensor": "Incubator", "readings": {"temperature": 29.0}}"#)
                .unwrap();
        assert_eq!(reading.sensor, "Incubator");
        assert_eq!(reading.readings["temperature"], 29.0);
    }

    #[test]
    fn test_build_sensors_from_default_config() {
        let sensors = build_sensors(&Config::default()).unwrap();
        assert!(sensors.contains_key("Incubator"));
    }
}
