use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::cli::convert::ConvertRequest;
use fxconv::cli::trend::TrendRequest;
use fxconv::core::config::MAX_TREND_YEARS;
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Convert {
                amount,
                from,
                to,
                dates,
                trend,
                years,
                json,
            } => fxconv::AppCommand::Convert(ConvertRequest {
                amount,
                from,
                to,
                dates,
                trend,
                years,
                json,
            }),
            Commands::Trend { from, to, years } => {
                fxconv::AppCommand::Trend(TrendRequest { from, to, years })
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Convert an amount using the latest or a historical rate
    Convert {
        /// Amount to convert
        amount: f64,
        /// Currency to convert from
        #[arg(short, long)]
        from: Option<String>,
        /// Currency to convert to
        #[arg(short, long)]
        to: Option<String>,
        /// Use the rate published on this date (YYYY-MM-DD), may be repeated
        #[arg(short, long = "date")]
        dates: Vec<NaiveDate>,
        /// Show the quarterly rate trend for the pair
        #[arg(long)]
        trend: bool,
        /// Years covered by the trend
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(1..=MAX_TREND_YEARS as i64)
        )]
        years: Option<u32>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display the quarterly rate trend for a currency pair
    Trend {
        /// Currency to convert from
        #[arg(short, long)]
        from: Option<String>,
        /// Currency to convert to
        #[arg(short, long)]
        to: Option<String>,
        /// Years covered by the trend
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(1..=MAX_TREND_YEARS as i64)
        )]
        years: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fxconv::cli::setup::setup_at_path(path),
            None => fxconv::cli::setup::setup(),
        },
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
