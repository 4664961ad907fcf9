use crate::alerts::{Alert, AlertKind};
use crate::sensors::MonitoredValue;
use anyhow::Result;

/// One-shot threshold evaluation: build an ad-hoc monitored value and print
/// the alerts a reading would raise.
pub fn handle_check_command(
    kind: &str,
    value: f64,
    setpoint: f64,
    warn: Option<&str>,
    alert: Option<&str>,
    json_output: bool,
) -> Result<()> {
    let kind: AlertKind = kind.parse()?;
    let monitored = MonitoredValue::from_spec(setpoint, kind, warn, alert)?;
    let alerts: Vec<Alert> = monitored.triggers(value).collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!(
            "OK: {} reading {} is within both bands around set-point {}",
            kind, value, setpoint
        );
    } else {
        for alert in &alerts {
            println!("{alert}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rejects_unknown_kind() {
        assert!(handle_check_command("pressure", 1.0, 1.0, None, None, false).is_err());
    }

    #[test]
    fn test_check_accepts_overrides() {
        assert!(handle_check_command("temperature", 29.0, 25.0, Some("3"), Some("5"), false).is_ok());
        assert!(handle_check_command("temperature", 29.0, 25.0, Some("bad"), None, false).is_err());
    }
}
