use crate::alerts::NotificationHandler;
use crate::config::Config;
use anyhow::{Context, Result};

pub fn handle_test_notify_command(config: &Config) -> Result<()> {
    let handler = NotificationHandler::new(
        config.notifications.enabled,
        config.notifications.recipients.clone(),
    );
    handler
        .send_test_notification()
        .context("Failed to send test notification")?;
    println!("Test notification sent");
    Ok(())
}
