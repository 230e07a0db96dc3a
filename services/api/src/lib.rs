mod cli;
mod infra;
mod routes;
mod server;
mod stats;

use subsidiematch::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
