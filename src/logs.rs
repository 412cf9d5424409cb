use async_trait::async_trait;

use crate::error::AlertError;
use crate::models::{FilterQuery, LogEntry};

/// Read side of the log store. Implementations return entries in the order
/// the store hands them back and never more than `query.limit`.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn filter_events(&self, query: &FilterQuery) -> Result<Vec<LogEntry>, AlertError>;
}
