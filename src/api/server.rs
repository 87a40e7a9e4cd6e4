//! HTTP server lifecycle: bind, serve the router, stop on Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::router::app_router;
use crate::pipeline::processor::DocumentProcessor;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(
    addr: SocketAddr,
    processor: Arc<DocumentProcessor>,
    max_upload_bytes: usize,
) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Cannot bind {addr}: {e}"))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Cannot read bound address: {e}"))?;

    let app = app_router(processor, max_upload_bytes);

    tracing::info!(addr = %local_addr, "MedEL server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))?;

    tracing::info!("MedEL server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
