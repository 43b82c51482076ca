mod cli;
mod config;
mod http;
mod state;
mod wiring;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::ConfigError;
use crate::http::HttpError;
use crate::wiring::WiringError;
use threadboard_infra::db::run_migrations;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("dotenv error: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("db error: {0}")]
    Db(#[from] threadboard_infra::db::DbPoolError),
    #[error("http error: {0}")]
    Http(#[from] HttpError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    config::load_dotenv()?;
    let config = config::AppConfig::from_env()?;
    let state = wiring::build_state(config)?;

    match state.db.as_ref() {
        Some(pool) if cli.mode.migrate(cli.skip_migrations) => {
            let embedded = run_migrations(pool).await?;
            info!(embedded, "database migrations applied");
        }
        None if !cli.mode.serve() => {
            warn!("no database configured; nothing to migrate");
        }
        _ => {}
    }

    if !cli.mode.serve() {
        close_storage(&state).await;
        return Ok(());
    }

    let addr = state.config.http_addr;
    info!(%addr, storage = %state.storage, "http server starting");
    let result = http::serve(addr, state.clone(), shutdown_signal()).await;
    close_storage(&state).await;
    result?;
    Ok(())
}

async fn close_storage(state: &crate::state::AppState) {
    if let Some(pool) = state.db.as_ref() {
        pool.close().await;
        info!("database pool closed");
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
