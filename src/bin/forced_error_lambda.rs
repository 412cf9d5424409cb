use clap::Parser;
use cwalert::aws::{self, SnsPublisher};
use cwalert::config::AppConfig;
use cwalert::handlers::forced_error::handle_forced_error;
use cwalert::models::HandlerResult;
use cwalert::utilities::setup_logger;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::info;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<HandlerResult, Error> {
    info!("Handling forced error request: {}", event.context.request_id);

    let app_config = AppConfig::try_parse_from(["forced_error_lambda"])?;
    let sdk_config = aws::build_config(&app_config).await;
    let publisher = SnsPublisher::new(&sdk_config);

    let result = handle_forced_error(&app_config.forced_error_settings(), &publisher).await?;
    Ok(result)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let app_config = AppConfig::try_parse_from(["forced_error_lambda"])?;
    setup_logger(app_config.log_level, None)?;

    lambda_runtime::run(service_fn(handle_request)).await
}
