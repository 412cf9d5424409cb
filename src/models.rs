use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AlertError;

pub type SendableError = Box<dyn std::error::Error + Send + Sync>;

/// Largest page size CloudWatch Logs accepts for `FilterLogEvents`.
pub const MAX_QUERY_LIMIT: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub log_stream_name: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
    pub event_id: Option<String>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            log_stream_name: None,
            timestamp: None,
            message: message.into(),
            event_id: None,
        }
    }
}

/// Inputs to one filtered read against a log group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub log_group_name: String,
    pub filter_pattern: String,
    pub limit: i32,
    /// Epoch millis; `None` searches the whole retention period.
    pub start_time: Option<i64>,
}

impl FilterQuery {
    pub fn new(
        log_group_name: impl Into<String>,
        filter_pattern: impl Into<String>,
        limit: u32,
    ) -> Result<Self, AlertError> {
        let log_group_name = log_group_name.into();
        if log_group_name.trim().is_empty() {
            return Err(AlertError::InvalidLogGroup(log_group_name));
        }

        let limit = i32::try_from(limit)
            .unwrap_or(MAX_QUERY_LIMIT)
            .clamp(1, MAX_QUERY_LIMIT);

        Ok(Self {
            log_group_name,
            filter_pattern: filter_pattern.into(),
            limit,
            start_time: None,
        })
    }

    pub fn with_start_time(mut self, start_time: Option<i64>) -> Self {
        self.start_time = start_time;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// What a handler hands back to the invoking runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandlerResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResult {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
