use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("log store unavailable: {0}")]
    LogStoreUnavailable(String),

    #[error("log group '{0}' does not exist")]
    InvalidLogGroup(String),

    #[error("notification topic is not configured")]
    TopicNotConfigured,

    #[error("publish rejected: {0}")]
    PublishRejected(String),

    #[error("{0}")]
    SimulatedError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
