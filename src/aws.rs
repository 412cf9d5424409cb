use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, SdkError};
use aws_sdk_cloudwatchlogs::operation::filter_log_events::FilterLogEventsError;
use aws_sdk_cloudwatchlogs::types::FilteredLogEvent;
use log::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AlertError;
use crate::logs::LogStore;
use crate::models::{FilterQuery, LogEntry, NotificationMessage};
use crate::notify::NotificationPublisher;
use crate::utilities::millis_to_datetime;

lazy_static! {
    static ref AWS_REGIONS: Vec<&'static str> = vec![
        "us-east-1", "us-east-2", "us-west-1", "us-west-2",
        "af-south-1", "ap-east-1", "ap-south-1", "ap-south-2",
        "ap-southeast-1", "ap-southeast-2", "ap-southeast-3",
        "ap-southeast-4", "ap-northeast-1", "ap-northeast-2",
        "ap-northeast-3", "ca-central-1", "ca-west-1",
        "eu-central-1", "eu-central-2", "eu-west-1", "eu-west-2",
        "eu-west-3", "eu-south-1", "eu-south-2", "eu-north-1",
        "il-central-1", "me-central-1", "me-south-1", "sa-east-1",
    ];
}

fn find_region(input: &str) -> Option<&'static str> {
    AWS_REGIONS.iter().find(|&&region| region == input).copied()
}

/// Regions outside the known list only warn, so newly launched regions keep working.
fn resolve_region(region: Option<&str>) -> Option<Region> {
    let region = region?;
    if find_region(region).is_none() {
        warn!("Region '{}' is not in the known region list, using it as given", region);
    }
    Some(Region::new(region.to_string()))
}

pub async fn build_config(app_config: &AppConfig) -> SdkConfig {
    let mut loader = aws_config::from_env();

    if let Some(profile_name) = app_config.profile.clone() {
        loader = loader.profile_name(profile_name);
    }

    if let Some(region) = resolve_region(app_config.region.as_deref()) {
        loader = loader.region(region);
    }

    loader.load().await
}

pub struct CloudWatchLogStore {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatchlogs::Client::new(config),
        }
    }
}

/// Upper bound on `FilterLogEvents` calls for one query.
pub const MAX_FILTER_PAGES: usize = 5;

struct FilterPage {
    events: Vec<LogEntry>,
    next_token: Option<String>,
}

#[async_trait]
trait FilterPageSource: Send + Sync {
    async fn fetch_page(
        &self,
        query: &FilterQuery,
        page_limit: i32,
        next_token: Option<String>,
    ) -> Result<FilterPage, AlertError>;
}

#[async_trait]
impl FilterPageSource for CloudWatchLogStore {
    async fn fetch_page(
        &self,
        query: &FilterQuery,
        page_limit: i32,
        next_token: Option<String>,
    ) -> Result<FilterPage, AlertError> {
        let filter_pattern = Some(query.filter_pattern.clone()).filter(|pattern| !pattern.is_empty());
        let resp = self
            .client
            .filter_log_events()
            .log_group_name(&query.log_group_name)
            .set_filter_pattern(filter_pattern)
            .set_start_time(query.start_time)
            .limit(page_limit)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| map_filter_error(&query.log_group_name, err))?;

        Ok(FilterPage {
            events: resp
                .events
                .unwrap_or_default()
                .into_iter()
                .map(to_log_entry)
                .collect(),
            next_token: resp.next_token,
        })
    }
}

#[async_trait]
impl LogStore for CloudWatchLogStore {
    async fn filter_events(&self, query: &FilterQuery) -> Result<Vec<LogEntry>, AlertError> {
        let result = collect_filtered_events(self, query).await?;
        info!("Retrieved {} event(s) for log group: {}", result.len(), query.log_group_name);
        Ok(result)
    }
}

// A page can come back short with a continuation token while the store is
// still scanning, so keep going until the cap is met or the page budget runs out.
async fn collect_filtered_events(
    source: &dyn FilterPageSource,
    query: &FilterQuery,
) -> Result<Vec<LogEntry>, AlertError> {
    let limit = query.limit.max(1) as usize;
    let mut result: Vec<LogEntry> = Vec::with_capacity(limit);
    let mut next_token = None;
    let mut pages = 0;

    loop {
        let remaining = (limit - result.len()) as i32;
        let page = source.fetch_page(query, remaining, next_token).await?;
        pages += 1;

        debug!("Page returned {} event(s) for log group: {}", page.events.len(), query.log_group_name);
        result.extend(page.events);
        result.truncate(limit);

        next_token = page.next_token;
        if result.len() >= limit || next_token.is_none() {
            break;
        }
        if pages >= MAX_FILTER_PAGES {
            debug!(
                "Stopping after {} page(s) for log group: {} with {} event(s)",
                pages,
                query.log_group_name,
                result.len()
            );
            break;
        }
    }

    Ok(result)
}

fn map_filter_error(log_group_name: &str, err: SdkError<FilterLogEventsError>) -> AlertError {
    let missing_group = err
        .as_service_error()
        .map(|service_err| service_err.is_resource_not_found_exception())
        .unwrap_or(false);

    if missing_group {
        AlertError::InvalidLogGroup(log_group_name.to_string())
    } else {
        AlertError::LogStoreUnavailable(DisplayErrorContext(&err).to_string())
    }
}

fn to_log_entry(event: FilteredLogEvent) -> LogEntry {
    LogEntry {
        log_stream_name: event.log_stream_name,
        timestamp: event.timestamp.and_then(millis_to_datetime),
        message: event.message.unwrap_or_default(),
        event_id: event.event_id,
    }
}

pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
}

impl SnsPublisher {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

#[async_trait]
impl NotificationPublisher for SnsPublisher {
    async fn publish(&self, topic_arn: &str, message: &NotificationMessage) -> Result<(), AlertError> {
        if topic_arn.trim().is_empty() {
            return Err(AlertError::TopicNotConfigured);
        }

        let resp = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(&message.subject)
            .message(&message.body)
            .send()
            .await
            .map_err(|err| {
                AlertError::PublishRejected(aws_sdk_sns::error::DisplayErrorContext(&err).to_string())
            })?;

        debug!("SNS accepted message id: {}", resp.message_id.unwrap_or_default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use aws_sdk_cloudwatchlogs::config::http::HttpResponse;
    use aws_sdk_cloudwatchlogs::types::error::ResourceNotFoundException;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    use super::*;

    struct ScriptedPages {
        pages: Mutex<VecDeque<Result<FilterPage, AlertError>>>,
        requests: Mutex<Vec<(i32, Option<String>)>>,
    }

    impl ScriptedPages {
        fn new(pages: Vec<Result<FilterPage, AlertError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(i32, Option<String>)> {
            self.requests.lock().expect("poisoned mutex").clone()
        }
    }

    #[async_trait]
    impl FilterPageSource for ScriptedPages {
        async fn fetch_page(
            &self,
            _query: &FilterQuery,
            page_limit: i32,
            next_token: Option<String>,
        ) -> Result<FilterPage, AlertError> {
            self.requests
                .lock()
                .expect("poisoned mutex")
                .push((page_limit, next_token));
            self.pages
                .lock()
                .expect("poisoned mutex")
                .pop_front()
                .unwrap_or(Ok(FilterPage { events: Vec::new(), next_token: None }))
        }
    }

    fn page(messages: &[&str], next_token: Option<&str>) -> Result<FilterPage, AlertError> {
        Ok(FilterPage {
            events: messages.iter().map(|m| LogEntry::new(*m)).collect(),
            next_token: next_token.map(str::to_string),
        })
    }

    fn query(limit: u32) -> FilterQuery {
        FilterQuery::new("/aws/lambda/my-app", "ERROR", limit).unwrap()
    }

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn finds_known_regions_only() {
        assert_eq!(find_region("eu-west-1"), Some("eu-west-1"));
        assert_eq!(find_region("moon-base-1"), None);
    }

    #[test]
    fn unknown_region_is_passed_through() {
        assert_eq!(resolve_region(Some("eu-west-1")), Some(Region::new("eu-west-1")));
        assert_eq!(resolve_region(Some("xx-future-1")), Some(Region::new("xx-future-1")));
        assert_eq!(resolve_region(None), None);
    }

    #[test]
    fn missing_group_maps_to_invalid_log_group() {
        let service_err = FilterLogEventsError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message("The specified log group does not exist.")
                .build(),
        );
        let raw = HttpResponse::new(
            StatusCode::try_from(400u16).expect("valid status"),
            SdkBody::empty(),
        );

        let mapped = map_filter_error("/aws/lambda/gone", SdkError::service_error(service_err, raw));

        assert_eq!(mapped, AlertError::InvalidLogGroup("/aws/lambda/gone".to_string()));
    }

    #[test]
    fn transport_failure_maps_to_unavailable() {
        let err: SdkError<FilterLogEventsError> = SdkError::timeout_error("connect timed out");

        let mapped = map_filter_error("/aws/lambda/my-app", err);

        assert!(matches!(mapped, AlertError::LogStoreUnavailable(_)));
    }

    #[tokio::test]
    async fn follows_token_past_short_page() {
        let source = ScriptedPages::new(vec![
            page(&[], Some("t1")),
            page(&["ERROR: a", "ERROR: b"], Some("t2")),
            page(&["ERROR: c", "ERROR: d", "ERROR: e"], Some("t3")),
        ]);

        let entries = collect_filtered_events(&source, &query(5)).await.unwrap();

        assert_eq!(messages(&entries), vec!["ERROR: a", "ERROR: b", "ERROR: c", "ERROR: d", "ERROR: e"]);
        assert_eq!(
            source.requests(),
            vec![(5, None), (5, Some("t1".to_string())), (3, Some("t2".to_string()))]
        );
    }

    #[tokio::test]
    async fn truncates_over_full_page_to_limit() {
        let source = ScriptedPages::new(vec![page(
            &["ERROR: 1", "ERROR: 2", "ERROR: 3", "ERROR: 4", "ERROR: 5", "ERROR: 6", "ERROR: 7"],
            Some("more"),
        )]);

        let entries = collect_filtered_events(&source, &query(5)).await.unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4].message, "ERROR: 5");
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn stops_when_no_token_remains() {
        let source = ScriptedPages::new(vec![page(&["ERROR: only"], None)]);

        let entries = collect_filtered_events(&source, &query(5)).await.unwrap();

        assert_eq!(messages(&entries), vec!["ERROR: only"]);
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn stops_after_page_budget() {
        let pages = (0..MAX_FILTER_PAGES + 3)
            .map(|i| page(&[], Some(&format!("t{i}"))))
            .collect();
        let source = ScriptedPages::new(pages);

        let entries = collect_filtered_events(&source, &query(5)).await.unwrap();

        assert!(entries.is_empty());
        assert_eq!(source.requests().len(), MAX_FILTER_PAGES);
    }

    #[tokio::test]
    async fn page_error_propagates() {
        let source = ScriptedPages::new(vec![
            page(&["ERROR: a"], Some("t1")),
            Err(AlertError::LogStoreUnavailable("AccessDeniedException".to_string())),
        ]);

        let result = collect_filtered_events(&source, &query(5)).await;

        assert!(matches!(result, Err(AlertError::LogStoreUnavailable(_))));
    }

    #[test]
    fn maps_filtered_event_fields() {
        let event = FilteredLogEvent::builder()
            .log_stream_name("2024/01/01/[$LATEST]abc")
            .timestamp(1_700_000_000_000)
            .message("ERROR: disk full")
            .event_id("evt-1")
            .build();

        let entry = to_log_entry(event);

        assert_eq!(entry.message, "ERROR: disk full");
        assert_eq!(entry.log_stream_name.as_deref(), Some("2024/01/01/[$LATEST]abc"));
        assert_eq!(entry.event_id.as_deref(), Some("evt-1"));
        assert_eq!(entry.timestamp.map(|t| t.timestamp_millis()), Some(1_700_000_000_000));
    }

    #[test]
    fn missing_message_becomes_empty_text() {
        let entry = to_log_entry(FilteredLogEvent::builder().build());
        assert_eq!(entry.message, "");
        assert_eq!(entry.timestamp, None);
    }
}
