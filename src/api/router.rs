//! HTTP router for the upload page and the processing endpoints.
//!
//! Routes:
//! - `GET /` upload page
//! - `POST /api/process` multipart upload (`file` field), runs the pipeline
//! - `GET /api/report` latest report file as a download
//! - `GET /health` liveness probe

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::api::page::UPLOAD_PAGE_HTML;
use crate::pipeline::processor::{DocumentProcessor, ProcessingOutcome};
use crate::pipeline::report::ReportError;

/// Shared handler state.
///
/// `busy` serializes whole requests: one document goes through the
/// pipeline at a time, later uploads wait their turn.
#[derive(Clone)]
pub struct AppState {
    processor: Arc<DocumentProcessor>,
    busy: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(processor: Arc<DocumentProcessor>) -> Self {
        Self {
            processor,
            busy: Arc::new(Mutex::new(())),
        }
    }
}

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_HEADROOM_BYTES: usize = 1024 * 1024;

/// Build the application router. `max_upload_bytes` bounds the PDF itself.
pub fn app_router(processor: Arc<DocumentProcessor>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(serve_upload_page))
        .route("/api/process", post(process_upload))
        .route("/api/report", get(download_report))
        .route("/health", get(|| async { "ok" }))
        .with_state(AppState::new(processor))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_HEADROOM_BYTES),
        ))
        .layer(TraceLayer::new_for_http())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn serve_upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

async fn process_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessingOutcome>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing `file` field".into()))?;

    // The task owns the guard: a dropped request must not release it early.
    let busy = Arc::clone(&state.busy);
    let processor = Arc::clone(&state.processor);
    let job = tokio::spawn(async move {
        let _guard = busy.lock_owned().await;
        tracing::info!(filename = %filename, size = bytes.len(), "Processing uploaded document");
        processor.process_bytes(bytes).await
    });

    let outcome = job
        .await
        .map_err(|e| ApiError::Internal(format!("processing task failed: {e}")))??;

    Ok(Json(outcome))
}

async fn download_report(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let path = state.processor.output_path();
    let bytes = tokio::fs::read(path).await.map_err(ReportError::Io)?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.json".to_string());
    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, bytes))
}
