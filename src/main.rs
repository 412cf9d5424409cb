use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use cwalert::aws::{self, CloudWatchLogStore, SnsPublisher};
use cwalert::config::AppConfig;
use cwalert::handlers::forced_error::handle_forced_error;
use cwalert::handlers::log_alert::handle_log_alert;
use cwalert::models::{HandlerResult, SendableError};
use cwalert::utilities::setup_logger;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "cwalert",
    version,
    about = "Run one of the alerting handlers once against real AWS."
)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Search the log group and publish any matches.
    LogAlert,
    /// Raise the synthetic error and publish its notification.
    ForcedError,
}

#[tokio::main]
async fn main() -> Result<(), SendableError> {
    let cli = Cli::parse();
    setup_logger(cli.config.log_level, cli.config.log_file.as_deref())?;
    info!("Starting cwalert with args: {:?}", cli);

    let result = match run(&cli.config, cli.command).await {
        Ok(result) => result,
        Err(err) => {
            error!("Invocation failed: {}", err);
            eprintln!("{} {}", "FAILED".red().bold(), err);
            return Err(err);
        }
    };

    let status = format!("{}", result.status_code);
    let status = if result.is_success() {
        status.green().bold()
    } else {
        status.yellow().bold()
    };
    println!("{} {}", status, serde_json::to_string(&result)?);

    info!("Done!");
    Ok(())
}

async fn run(config: &AppConfig, command: Command) -> Result<HandlerResult, SendableError> {
    let sdk_config = aws::build_config(config).await;
    let publisher = SnsPublisher::new(&sdk_config);

    let result = match command {
        Command::LogAlert => {
            let settings = config.log_alert_settings(Utc::now())?;
            let store = CloudWatchLogStore::new(&sdk_config);
            handle_log_alert(&settings, &store, &publisher).await?
        }
        Command::ForcedError => {
            handle_forced_error(&config.forced_error_settings(), &publisher).await?
        }
    };
    Ok(result)
}
