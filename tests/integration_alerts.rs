use incmon::alerts::{
    Alert, AlertHandler, AlertState, Level, MonitorPolicy, Notifier, Threshold,
};
use incmon::config::{Config, SensorConfig};
use incmon::sensors::Sensor;
use anyhow::Result;
use chrono::Duration;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// End-to-end tests for the alert lifecycle: readings in, debounced
/// notifications out.

#[derive(Clone, Default)]
struct Recorder {
    fired: Rc<RefCell<Vec<(String, Level)>>>,
}

impl Notifier for Recorder {
    fn notify(&self, state: &AlertState) -> Result<()> {
        self.fired
            .borrow_mut()
            .push((state.sensor().to_string(), state.severity()));
        Ok(())
    }
}

fn incubator_config() -> SensorConfig {
    SensorConfig {
        name: "Incubator 1".to_string(),
        temperature: Some(25.0),
        humidity: Some(50.0),
        temperature_warning: None,
        temperature_alert: None,
        humidity_warning: None,
        humidity_alert: None,
    }
}

fn readings(feature: &str, value: f64) -> HashMap<String, f64> {
    HashMap::from([(feature.to_string(), value)])
}

#[test]
fn test_warning_only_deviation() {
    // set-point 25, warn 3, alert 5; reading 29 deviates by 4
    let sensor = incubator_config().build().unwrap();
    let monitored = sensor.monitored("temperature").unwrap();

    let alerts: Vec<Alert> = monitored.triggers(29.0).collect();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level(), Level::Warning);
}

#[test]
fn test_both_levels_from_one_reading() {
    // reading 32 deviates by 7: outside both the 3-band and the 5-band
    let sensor = incubator_config().build().unwrap();
    let monitored = sensor.monitored("temperature").unwrap();

    let alerts: Vec<Alert> = monitored.triggers(32.0).collect();
    assert_eq!(alerts.len(), 2);
    let levels: Vec<Level> = alerts.iter().map(|a| a.level()).collect();
    assert!(levels.contains(&Level::Warning));
    assert!(levels.contains(&Level::Alert));
}

#[test]
fn test_debounced_notification_fires_once() {
    let sensor = incubator_config().build().unwrap();
    let recorder = Recorder::default();
    let policy = MonitorPolicy {
        expiry: Duration::minutes(30),
        warning_count: 2,
        alert_count: 10,
    };
    let mut handler = AlertHandler::new(policy, recorder.clone());

    // 1st warning: below the count threshold, nothing fires
    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 0);

    // 2nd warning: gate opens, exactly one notification
    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 1);

    // 3rd warning: notified_at is set, gate stays shut
    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 1);
}

#[test]
fn test_expired_state_is_removed_after_window() {
    let sensor = incubator_config().build().unwrap();
    let policy = MonitorPolicy {
        expiry: Duration::zero(),
        warning_count: 1,
        alert_count: 1,
    };
    let mut handler = AlertHandler::new(policy, Recorder::default());

    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    // with a zero-length window the state expired during the sweep
    assert!(handler.states(sensor.name()).is_empty());
}

#[test]
fn test_escalation_episode_fires_twice() {
    let sensor = incubator_config().build().unwrap();
    let recorder = Recorder::default();
    let policy = MonitorPolicy {
        expiry: Duration::minutes(30),
        warning_count: 2,
        alert_count: 1,
    };
    let mut handler = AlertHandler::new(policy, recorder.clone());

    // warning episode
    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 1);
    assert_eq!(recorder.fired.borrow()[0].1, Level::Warning);

    // repetition at the same severity is suppressed
    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 1);

    // escalation re-arms the gate and fires again at alert severity
    handler.handle(&sensor, &readings("temperature", 32.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 2);
    assert_eq!(recorder.fired.borrow()[1].1, Level::Alert);
}

#[test]
fn test_unknown_feature_propagates() {
    let sensor = incubator_config().build().unwrap();
    let mut handler = AlertHandler::new(MonitorPolicy::default(), Recorder::default());

    let result = handler.handle(&sensor, &readings("pressure", 1.0));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("pressure"));
}

#[test]
fn test_sensors_are_independent() {
    let left = incubator_config().build().unwrap();
    let right = SensorConfig {
        name: "Incubator 2".to_string(),
        ..incubator_config()
    }
    .build()
    .unwrap();

    let recorder = Recorder::default();
    let policy = MonitorPolicy {
        expiry: Duration::minutes(30),
        warning_count: 2,
        alert_count: 1,
    };
    let mut handler = AlertHandler::new(policy, recorder.clone());

    handler.handle(&left, &readings("temperature", 29.0)).unwrap();
    handler.handle(&right, &readings("temperature", 29.0)).unwrap();
    // each sensor has one warning; neither crossed its own count threshold
    assert_eq!(recorder.fired.borrow().len(), 0);

    handler.handle(&left, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 1);
    assert_eq!(recorder.fired.borrow()[0].0, "Incubator 1");
    assert_eq!(handler.states("Incubator 2").len(), 1);
}

#[test]
fn test_boundary_readings_never_alert() {
    let sensor = Sensor::incubator("edge");
    let temperature = sensor.monitored("temperature").unwrap();
    for reading in [22.0, 25.0, 28.0] {
        assert_eq!(temperature.triggers(reading).count(), 0);
    }
}

#[test]
fn test_alert_construction_rejects_in_band_triples() {
    let threshold = Threshold::absolute(3.0, 3.0, Level::Warning);
    assert!(Alert::new(
        threshold,
        26.0,
        25.0,
        incmon::alerts::AlertKind::Temperature
    )
    .is_err());
}

#[test]
fn test_config_round_trip_drives_the_engine() {
    let mut config = Config::default();
    config.monitoring.warning_count = 1;
    config.sensors = vec![incubator_config()];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    config.save_path(&path).unwrap();
    let loaded = Config::load_from(path.to_str()).unwrap();

    let sensor = loaded.sensors[0].build().unwrap();
    let recorder = Recorder::default();
    let mut handler = AlertHandler::new(loaded.monitoring.policy(), recorder.clone());

    handler.handle(&sensor, &readings("temperature", 29.0)).unwrap();
    assert_eq!(recorder.fired.borrow().len(), 1);
}
