mod db;
mod error;
mod models;
mod operations;

use clap::Parser;
use error::AppError;
use operations::tracker::{run_tracker, today, FinanceTracker};
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Record income and expenses and see where the money goes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. Created on first run.
    #[arg(long, default_value = "finance.db")]
    db_path: String,

    /// File that receives the application log. The terminal is taken by the UI.
    #[arg(long, default_value = "finance_tracker.log")]
    log_file: String,

    /// One of error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    setup_logging(&args.log_file, parse_log_level(&args.log_level))?;
    tracing::info!("Starting with database {}", args.db_path);

    let conn = db::connection::establish_connection(&args.db_path)?;
    let mut tracker = FinanceTracker::new(conn, &today());
    run_tracker(&mut tracker)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(path: &str, level: LevelFilter) -> Result<(), AppError> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Logging(format!("could not open '{}': {}", path, e)))?;

    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(level);

    tracing_subscriber::registry()
        .with(file_log)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
