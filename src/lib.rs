pub mod api; // Upload page + processing endpoints
pub mod config;
pub mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use config::AppConfig;
use pipeline::extraction::PdfTextExtractor;
use pipeline::inference::{OllamaClient, WorkerPool};
use pipeline::processor::DocumentProcessor;

/// Entry point for the `medel` binary.
///
/// With a path argument, processes that one PDF and prints the result as
/// JSON. Without one, serves the web UI until Ctrl-C.
pub fn run() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run_inner(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_inner(input: Option<PathBuf>) -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;

    // The blocking HTTP client owns its own runtime, so it is built (and
    // finally dropped) outside the tokio runtime below.
    let client = Arc::new(
        OllamaClient::new(
            &config.ollama_url,
            &config.model,
            config.generation,
            config.stream_tokens,
        )
        .map_err(|e| e.to_string())?,
    );
    check_model(&client);

    let processor = Arc::new(DocumentProcessor::new(
        Arc::new(PdfTextExtractor),
        client.clone(),
        WorkerPool::new(config.workers),
        config.questions.clone(),
        config.output_path.clone(),
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Cannot start async runtime: {e}"))?;

    let result = runtime.block_on(async {
        match input {
            Some(path) => process_one(&processor, &path).await,
            None => {
                let addr = config.bind_addr().map_err(|e| e.to_string())?;
                let max_upload = usize::try_from(config.max_upload_bytes).unwrap_or(usize::MAX);
                api::serve(addr, processor.clone(), max_upload).await
            }
        }
    });

    drop(runtime);
    drop(processor);
    drop(client);
    result
}

/// One-shot mode: process a single file and print the outcome.
async fn process_one(
    processor: &DocumentProcessor,
    path: &std::path::Path,
) -> Result<(), String> {
    tracing::info!(path = %path.display(), "Processing single document");
    let outcome = processor
        .process_file(path)
        .await
        .map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

/// Warn early when the model is missing. The runtime loads it lazily, so
/// this never stops startup.
fn check_model(client: &OllamaClient) {
    match client.is_model_available() {
        Ok(true) => tracing::info!(model = client.model(), "Model available"),
        Ok(false) => tracing::warn!(
            model = client.model(),
            "Model not found in Ollama; pull it before processing documents"
        ),
        Err(e) => tracing::warn!(url = client.base_url(), "Cannot reach Ollama: {e}"),
    }
}
