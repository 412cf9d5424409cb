use chrono::Utc;
use clap::Parser;
use cwalert::aws::{self, CloudWatchLogStore, SnsPublisher};
use cwalert::config::AppConfig;
use cwalert::handlers::log_alert::handle_log_alert;
use cwalert::models::HandlerResult;
use cwalert::utilities::setup_logger;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::info;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<HandlerResult, Error> {
    info!("Handling log alert request: {}", event.context.request_id);

    let app_config = AppConfig::try_parse_from(["log_alert_lambda"])?;
    let settings = app_config.log_alert_settings(Utc::now())?;

    let sdk_config = aws::build_config(&app_config).await;
    let store = CloudWatchLogStore::new(&sdk_config);
    let publisher = SnsPublisher::new(&sdk_config);

    let result = handle_log_alert(&settings, &store, &publisher).await?;
    Ok(result)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let app_config = AppConfig::try_parse_from(["log_alert_lambda"])?;
    setup_logger(app_config.log_level, None)?;

    lambda_runtime::run(service_fn(handle_request)).await
}
