use log::info;

use crate::config::LogAlertSettings;
use crate::error::AlertError;
use crate::logs::LogStore;
use crate::models::{HandlerResult, LogEntry, NotificationMessage};
use crate::notify::{send_notification, NotificationPublisher};

pub const LOG_ALERT_SUBJECT: &str = "CloudWatch Log Alert";
pub const LOG_ALERT_HEADER: &str = "Error Logs Detected:";
pub const COMPLETION_MESSAGE: &str = "Execution completed!";

/// Header line followed by each message, newline separated, in store order.
pub fn format_alert_body(entries: &[LogEntry]) -> String {
    let messages = entries
        .iter()
        .map(|entry| entry.message.as_str())
        .collect::<Vec<&str>>()
        .join("\n");
    format!("{}\n{}", LOG_ALERT_HEADER, messages)
}

/// Queries once and publishes at most one notification. Failures from either
/// collaborator propagate to the caller untouched.
pub async fn handle_log_alert(
    settings: &LogAlertSettings,
    store: &dyn LogStore,
    publisher: &dyn NotificationPublisher,
) -> Result<HandlerResult, AlertError> {
    let query = &settings.query;
    info!(
        "Searching log group '{}' for pattern '{}' (limit {})",
        query.log_group_name, query.filter_pattern, query.limit
    );

    let entries = store.filter_events(query).await?;

    if entries.is_empty() {
        info!("No matching log events, nothing to notify");
    } else {
        info!("Found {} matching log event(s)", entries.len());
        let message = NotificationMessage::new(LOG_ALERT_SUBJECT, format_alert_body(&entries));
        send_notification(publisher, settings.topic_arn.as_deref(), &message).await?;
    }

    Ok(HandlerResult::new(200, completion_body()))
}

fn completion_body() -> String {
    serde_json::Value::String(COMPLETION_MESSAGE.to_string()).to_string()
}
