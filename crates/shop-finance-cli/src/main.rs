mod commands;
mod config;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

use commands::assets::RegisterArgs;
use commands::depreciation::DepreciationArgs;
use commands::forecast::ForecastArgs;
use commands::ratios::RatiosArgs;

/// Shop back-office financial analytics
#[derive(Parser)]
#[command(
    name = "sfa",
    version,
    about = "Shop back-office financial analytics",
    long_about = "A CLI for the shop's back-office reports with decimal precision. \
                  Computes fixed-asset depreciation and book values, asset register \
                  totals, liquidity/profitability/leverage ratios, and confidence-weighted \
                  cash-flow forecasts from historical entries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML file with engine settings (overrides settings embedded in the input)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Depreciation and book value of one fixed asset
    Depreciation(DepreciationArgs),
    /// Book value and depreciation totals across the asset register
    AssetRegister(RegisterArgs),
    /// Liquidity, profitability, efficiency and leverage ratios
    Ratios(RatiosArgs),
    /// Monthly cash-flow forecast from historical entries
    Forecast(ForecastArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let engine = match config::load(cli.config.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::AssetRegister(args) => commands::assets::run_asset_register(args),
        Commands::Ratios(args) => commands::ratios::run_ratios(args, engine.as_ref()),
        Commands::Forecast(args) => commands::forecast::run_forecast(args, engine.as_ref()),
        Commands::Version => {
            println!("sfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
