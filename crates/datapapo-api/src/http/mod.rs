//! HTTP API for a browser front-end.
//!
//! Routes live under `/api/v1/`. The server holds one active analysis
//! session; uploading a dataset replaces it (and clears the transcript).

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::state::AppState;

/// Start the HTTP server, shutting down gracefully on Ctrl+C.
pub async fn serve(state: AppState, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| state.config.http.host.clone());
    let port = port.unwrap_or(state.config.http.port);
    let web_dir = state.config.http.web_dir.clone();

    let app = router::build_router(state, web_dir.as_deref());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown_signal.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    Ok(())
}
