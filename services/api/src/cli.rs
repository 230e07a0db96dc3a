use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use subsidiematch::error::AppError;

use crate::server;
use crate::stats::run_stats;

#[derive(Parser, Debug)]
#[command(
    name = "SubsidieMatch",
    about = "Serve and inspect the subsidy eligibility matching engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load a corpus directory and print per-family record counts
    Stats(StatsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the scheme corpus directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Override the matcher rules directory
    #[arg(long)]
    pub(crate) rules_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// Scheme corpus directory to inspect
    #[arg(long, default_value = "data/subsidies")]
    pub(crate) data_dir: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Stats(args) => run_stats(args),
    }
}
