use std::sync::Arc;

use shared::config::{NotifyConfig, WorkerConfig};
use shared::contacts::Store;
use shared::notify::{NotificationDispatcher, RelayEmail, TwilioSms};
use tokio::signal;
use tracing::{error, info};

use crate::medication_reminders::MedicationReminderHandler;
use crate::scheduler::ReminderScheduler;

mod medication_reminders;
mod scheduler;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "worker=debug".to_string()))
        .init();

    let config = match WorkerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read worker config: {err}");
            std::process::exit(1);
        }
    };
    let notify_config = NotifyConfig::from_env();

    let store = match Store::connect(&config.database_url, config.database_max_connections).await {
        Ok(store) => store,
        Err(err) => {
            error!("failed to connect to postgres: {err}");
            std::process::exit(1);
        }
    };

    info!(
        sms_enabled = notify_config.sms.is_some(),
        email_enabled = notify_config.email.is_some(),
        "notification channels configured"
    );

    let dispatcher = NotificationDispatcher::new(
        TwilioSms::new(notify_config.sms.clone()),
        RelayEmail::new(notify_config.email.clone()),
    );
    let handler = Arc::new(MedicationReminderHandler::new(store, dispatcher));

    let mut scheduler = ReminderScheduler::new(config.time_zone);
    scheduler.start(&config.reminder_times, handler);

    info!(
        reminder_times = %config
            .reminder_times
            .iter()
            .map(|spec| spec.hhmm())
            .collect::<Vec<_>>()
            .join(","),
        "worker started; waiting for shutdown signal"
    );

    if let Err(err) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutdown signal received");
    scheduler.stop();
}
