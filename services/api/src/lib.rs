mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use uae_flood::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
