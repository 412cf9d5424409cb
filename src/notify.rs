use async_trait::async_trait;
use log::info;

use crate::error::AlertError;
use crate::models::NotificationMessage;

#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, topic_arn: &str, message: &NotificationMessage) -> Result<(), AlertError>;
}

/// Resolves the target topic and performs exactly one publish.
pub async fn send_notification(
    publisher: &dyn NotificationPublisher,
    topic_arn: Option<&str>,
    message: &NotificationMessage,
) -> Result<(), AlertError> {
    let topic_arn = match topic_arn {
        Some(arn) if !arn.trim().is_empty() => arn,
        _ => return Err(AlertError::TopicNotConfigured),
    };

    if message.subject.trim().is_empty() {
        return Err(AlertError::PublishRejected(
            "notification subject must not be empty".to_string(),
        ));
    }

    info!("Publishing '{}' to topic: {}", message.subject, topic_arn);
    publisher.publish(topic_arn, message).await?;
    info!("Notification accepted by topic: {}", topic_arn);
    Ok(())
}
