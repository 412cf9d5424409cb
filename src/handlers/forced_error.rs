use log::error;

use crate::config::ForcedErrorSettings;
use crate::error::AlertError;
use crate::models::{HandlerResult, NotificationMessage};
use crate::notify::{send_notification, NotificationPublisher};

pub const SIMULATED_ERROR_MESSAGE: &str = "This is a forced error to trigger CloudWatch Alarm!";
// SNS subjects must be ASCII.
pub const FORCED_ERROR_SUBJECT: &str = "Lambda Function Error Alert!";
pub const FORCED_ERROR_BODY: &str = "Error has been triggered and notified!";

/// Always fails. Exists to drive the alerting path deterministically.
pub fn simulate_failure() -> Result<(), AlertError> {
    Err(AlertError::SimulatedError(SIMULATED_ERROR_MESSAGE.to_string()))
}

/// Always answers 500. A rejected publish is logged and does not change the
/// response.
pub async fn handle_forced_error(
    settings: &ForcedErrorSettings,
    publisher: &dyn NotificationPublisher,
) -> Result<HandlerResult, AlertError> {
    if let Err(err) = simulate_failure() {
        error!("Lambda Function Error: {}", err);

        let message = NotificationMessage::new(
            FORCED_ERROR_SUBJECT,
            format!("An error occurred in Lambda: {}", err),
        );
        if let Err(publish_err) =
            send_notification(publisher, Some(&settings.topic_arn), &message).await
        {
            error!("Failed to publish error notification: {}", publish_err);
        }
    }

    Ok(HandlerResult::new(500, FORCED_ERROR_BODY))
}
