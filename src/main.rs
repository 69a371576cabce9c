use clap::Parser;
use color_eyre::Result;
use colored::Colorize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::registry::ProviderRegistry;
use crate::request::BucketRequest;

mod cli;
mod config;
mod dispatch;
mod provider;
mod registry;
mod report;
mod request;

/// Exit status for invalid flag combinations.
const EXIT_USAGE: i32 = 1;
/// Exit status with `--fail-on-error` when a provider operation failed.
const EXIT_UNIT_FAILED: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine.
    let _ = dotenv::dotenv();
    let guard = initialize_logging()?;
    info!("Starting multicloud");

    let args = cli::Args::parse();
    let request = match BucketRequest::try_from(&args) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "Invalid arguments");
            eprintln!("{} {err}", "Error:".red().bold());
            drop(guard);
            std::process::exit(EXIT_USAGE);
        }
    };

    let config = config::load()?;
    let mut registry = ProviderRegistry::new();
    provider::register_all(&mut registry, &config);

    info!(
        mode = %request.mode,
        bucket = %request.bucket,
        providers = ?request.providers,
        "Dispatching bucket request"
    );
    let summary = dispatch::run(&request, &registry).await;

    println!("{}", "✅ Operation finished.".green().bold());
    info!(failed = summary.failed(), units = summary.units.len(), "Operation finished");

    if args.fail_on_error && summary.has_failures() {
        drop(guard);
        std::process::exit(EXIT_UNIT_FAILED);
    }

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("multicloud").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "multicloud.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
