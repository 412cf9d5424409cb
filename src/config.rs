use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use parse_duration::parse;

use crate::error::AlertError;
use crate::models::FilterQuery;

pub const DEFAULT_LOG_GROUP: &str = "/aws/lambda/my-app";
pub const DEFAULT_FILTER_PATTERN: &str = "ERROR";
pub const DEFAULT_MAX_EVENTS: u32 = 5;
pub const DEFAULT_FORCED_ERROR_TOPIC_ARN: &str =
    "arn:aws:sns:us-east-1:123456789012:YourExistingSNSTopic";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "cwalert",
    version,
    about = "Poll CloudWatch Logs for errors and forward them to an SNS topic."
)]
pub struct AppConfig {
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    #[arg(long)]
    pub profile: Option<String>,

    #[arg(long, env = "LOG_GROUP_NAME", default_value = DEFAULT_LOG_GROUP)]
    pub log_group: String,

    #[arg(long, env = "FILTER_PATTERN", default_value = DEFAULT_FILTER_PATTERN)]
    pub filter_pattern: String,

    #[arg(long, env = "MAX_EVENTS", default_value_t = DEFAULT_MAX_EVENTS)]
    pub max_events: u32,

    #[arg(long, env = "SNS_TOPIC_ARN")]
    pub topic_arn: Option<String>,

    #[arg(long, env = "FORCED_ERROR_TOPIC_ARN", default_value = DEFAULT_FORCED_ERROR_TOPIC_ARN)]
    pub forced_error_topic_arn: String,

    /// Only search events newer than this, e.g. "15m" or "1h".
    #[arg(long, env = "LOOKBACK")]
    pub lookback: Option<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: log::LevelFilter,

    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Everything the log alert handler needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogAlertSettings {
    pub query: FilterQuery,
    pub topic_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedErrorSettings {
    pub topic_arn: String,
}

impl AppConfig {
    pub fn lookback_start(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, AlertError> {
        let Some(lookback) = &self.lookback else {
            return Ok(None);
        };

        let duration = parse(lookback).map_err(|e| {
            AlertError::InvalidConfig(format!("failed to parse lookback '{}': {}", lookback, e))
        })?;
        let duration = chrono::Duration::from_std(duration).map_err(|e| {
            AlertError::InvalidConfig(format!("lookback '{}' is out of range: {}", lookback, e))
        })?;

        Ok(Some(now - duration))
    }

    pub fn log_alert_settings(&self, now: DateTime<Utc>) -> Result<LogAlertSettings, AlertError> {
        let start_time = self.lookback_start(now)?.map(|start| start.timestamp_millis());
        let query = FilterQuery::new(&self.log_group, &self.filter_pattern, self.max_events)?
            .with_start_time(start_time);

        Ok(LogAlertSettings {
            query,
            topic_arn: self.topic_arn.clone().filter(|arn| !arn.trim().is_empty()),
        })
    }

    pub fn forced_error_settings(&self) -> ForcedErrorSettings {
        ForcedErrorSettings {
            topic_arn: self.forced_error_topic_arn.clone(),
        }
    }
}
