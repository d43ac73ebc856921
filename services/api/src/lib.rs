mod calc;
mod chat;
mod cli;
mod infra;
mod routes;
mod server;

use ielts_band::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
