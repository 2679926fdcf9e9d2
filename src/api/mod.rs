mod cli;
mod infra;
mod report;
mod routes;
mod server;

pub use infra::{AppState, InMemoryWaitlistRepository, LoggingNotifier};
pub use routes::app_router;

use crate::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
