use serde::{Deserialize, Serialize};

use super::GenerationError;

/// Sampling and runtime parameters sent with every generation.
///
/// Fixed at startup; the runtime receives them as Ollama `options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Context window size in tokens.
    pub num_ctx: u32,
    pub num_batch: u32,
    /// Number of layers offloaded to the GPU.
    pub num_gpu: u32,
    pub seed: i64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            num_ctx: 2048,
            num_batch: 512,
            num_gpu: 1,
            seed: 10,
        }
    }
}

/// A single prompt-in, text-out call to the language model.
///
/// Constructed once at startup and shared by reference; implementations
/// must tolerate concurrent calls when the worker pool capacity is above 1.
pub trait LlmGenerate {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
