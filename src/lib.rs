pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::convert::ConvertRequest;
use crate::cli::trend::TrendRequest;
use crate::core::config::AppConfig;
use crate::providers::FrankfurterProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert(ConvertRequest),
    Trend(TrendRequest),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let frankfurter = config.frankfurter();
    let provider = FrankfurterProvider::new(&frankfurter.base_url, frankfurter.timeout())?;

    match command {
        AppCommand::Currencies => cli::currencies::run(&provider).await,
        AppCommand::Convert(request) => cli::convert::run(&provider, &config, request).await,
        AppCommand::Trend(request) => cli::trend::run(&provider, &config, request).await,
    }
}
