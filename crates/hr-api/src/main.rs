//! HR assistant API server.
//!
//! Answers employee questions over a CSV employee table, drives the
//! location-confirmation and HR-email flows, and serves generated W-2s.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hr_api::config::ApiConfig;
use hr_api::routes;
use hr_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hr-api starting");

    let config = ApiConfig::load()?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState::from_config(config);
    let app = routes::build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
