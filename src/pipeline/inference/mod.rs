pub mod types;
pub mod ollama;
pub mod mock;
pub mod pool;

pub use types::*;
pub use ollama::*;
pub use mock::*;
pub use pool::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Generation worker failed: {0}")]
    WorkerFailed(String),
}
