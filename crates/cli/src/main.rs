use crate::{
    commands::Commands,
    env::{load_env, resolve_settings},
    error::CliError,
    progress::BarProgress,
};
use clap::Parser;
use engine_core::{
    fetcher::TableFetcher,
    progress::{LogProgress, ProgressReporter},
    request::FetchRequest,
};
use std::{sync::Arc, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod output;
mod progress;

#[derive(Parser)]
#[command(
    name = "tablefetch",
    version,
    about = "Read a whole database table into memory, chunk by chunk"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            conn,
            table,
            columns,
            chunk_size,
            adaptive,
            latency_threshold_ms,
            debug,
            format,
            output,
            stats,
            quiet,
        } => {
            let env = load_env(&conn)?;
            let settings = resolve_settings(&conn, &env)?;

            let progress: Arc<dyn ProgressReporter> = if quiet {
                Arc::new(LogProgress::default())
            } else {
                Arc::new(BarProgress::new())
            };
            let fetcher = TableFetcher::new(settings, debug).with_progress(progress);

            let mut request = FetchRequest::new(table)
                .chunk_size(chunk_size)
                .adaptive(adaptive)
                .latency_threshold(Duration::from_millis(latency_threshold_ms));
            if let Some(columns) = columns {
                request = request.columns(columns);
            }

            let fetched = fetcher.fetch_with_stats(&request).await?;
            if stats {
                eprintln!("{}", serde_json::to_string_pretty(&fetched.stats)?);
            }

            let rendered = output::render(&fetched.table, format, &fetcher.display_options())?;
            output::write_output(&rendered, output.as_deref()).await?;
            if let Some(path) = output {
                info!(
                    "Wrote {} rows to {}",
                    fetched.table.num_rows(),
                    path.display()
                );
            }
        }
        Commands::Ping { conn: args } => {
            let env = load_env(&args)?;
            let settings = resolve_settings(&args, &env)?;
            conn::ping(&settings).await?;
            println!("OK");
        }
    }

    Ok(())
}
