// Gateway module for the HTTP surface - follows the Train Station Pattern

mod error;
mod payload;
mod routes;

pub use error::{ApiError, ErrorBody};
pub use payload::{parse_amount, parse_analyze_request, AnalyzeRequest, ClassifyRequest};
pub use routes::router;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppState, Config};

/// Bind and serve the API until Ctrl-C
pub async fn serve(config: Config, bind_override: Option<String>) -> Result<()> {
    let bind = bind_override.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::from_config(config).context("Failed to initialise the analysis pipeline")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(addr = %bind, "DRE analysis API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
