use crate::output::OutputFormat;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a whole table and print it
    Fetch {
        #[command(flatten)]
        conn: ConnectionArgs,

        #[arg(long, help = "Table to read, optionally as schema.table")]
        table: String,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated columns to select (default: all)"
        )]
        columns: Option<Vec<String>>,

        #[arg(long, default_value_t = 100, help = "Rows per round trip")]
        chunk_size: usize,

        #[arg(long, help = "Tune the chunk size from batch latency")]
        adaptive: bool,

        #[arg(
            long,
            default_value_t = 1000,
            help = "Batches slower than this halve the chunk size in adaptive mode"
        )]
        latency_threshold_ms: u64,

        #[arg(long, help = "Cap the result at 2000 rows and widen the printed table")]
        debug: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[arg(
            long,
            help = "If specified, writes the result to this file instead of stdout"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Print fetch statistics as JSON to stderr")]
        stats: bool,

        #[arg(long, help = "Hide the progress bar")]
        quiet: bool,
    },
    /// Test that the database accepts a connection
    Ping {
        #[command(flatten)]
        conn: ConnectionArgs,
    },
}

/// Connection flags shared by every command. Unset flags fall back to the
/// matching `TABLEFETCH_*` variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Database driver: "mysql", "mariadb", "pg", "postgres", "postgresql"
    #[arg(long)]
    pub driver: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, short = 'u')]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long, short = 'd')]
    pub database: Option<String>,

    #[arg(long, help = "Env file to load (default: ~/.tablefetch/.env)")]
    pub env_file: Option<PathBuf>,
}
