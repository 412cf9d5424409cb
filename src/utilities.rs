use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use std::time::SystemTime;

use crate::models::SendableError;

pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Installs the global fern logger. Lambda binaries pass no file since
/// CloudWatch already captures stdout.
pub fn setup_logger(level: log::LevelFilter, log_file: Option<&Path>) -> Result<(), SendableError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("aws_config", log::LevelFilter::Warn)
        .level_for("aws_smithy_runtime", log::LevelFilter::Warn)
        .chain(std::io::stdout());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_epoch_millis() {
        let converted = millis_to_datetime(1_700_000_000_123).unwrap();
        assert_eq!(converted.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(millis_to_datetime(i64::MAX), None);
    }
}
