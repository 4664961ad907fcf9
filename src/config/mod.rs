pub mod settings;

pub use settings::{Config, MonitoringConfig, NotificationConfig, SensorConfig};
