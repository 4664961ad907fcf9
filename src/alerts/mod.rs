pub mod alert;
pub mod handler;
pub mod notifications;
pub mod state;
pub mod thresholds;

pub use alert::{Alert, AlertKind};
pub use handler::{AlertHandler, Notifier};
pub use notifications::NotificationHandler;
pub use state::{AlertState, MonitorPolicy};
pub use thresholds::{Level, Threshold};
