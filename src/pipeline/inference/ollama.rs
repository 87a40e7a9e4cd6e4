use std::io::{BufRead, BufReader, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{GenerationOptions, LlmGenerate};
use super::GenerationError;

/// Only the TCP connect is bounded; generations run as long as the model needs.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    model: String,
    options: GenerationOptions,
    stream_tokens: bool,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at a local Ollama instance.
    pub fn new(
        base_url: &str,
        model: &str,
        options: GenerationOptions,
        stream_tokens: bool,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            options,
            stream_tokens,
            client,
        })
    }

    /// The model tag used for every generation.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the models the runtime can serve.
    pub fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model is present on the runtime.
    pub fn is_model_available(&self) -> Result<bool, GenerationError> {
        let models = self.list_models()?;
        Ok(model_matches(&models, &self.model))
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_connect() {
            GenerationError::OllamaConnection(self.base_url.clone())
        } else {
            GenerationError::HttpClient(e.to_string())
        }
    }
}

/// `mistral-openorca` matches `mistral-openorca:latest`, tags must match exactly.
fn model_matches(available: &[String], model: &str) -> bool {
    available.iter().any(|name| {
        name == model
            || (!model.contains(':') && name.split(':').next() == Some(model))
    })
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    /// Send the prompt verbatim, without the model's chat template.
    raw: bool,
    options: &'a GenerationOptions,
}

/// Response body from Ollama /api/generate (also one line of a streamed response)
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmGenerate for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: self.stream_tokens,
            raw: true,
            options: &self.options,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        if self.stream_tokens {
            // `Stdout` locks per write, so other writers interleave between tokens.
            return collect_stream(BufReader::new(response), &mut std::io::stdout());
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(GenerationError::OllamaError {
                status: status.as_u16(),
                body: error,
            });
        }

        Ok(parsed.response)
    }
}

/// Read a newline-delimited streamed generation, echoing each partial
/// token to `sink` as it arrives. Returns the full generated text.
///
/// A stream that ends without a `done` chunk is an error, not a short answer.
/// Sink write failures are ignored: the echo is observability only.
pub fn collect_stream<R: BufRead, W: Write>(
    reader: R,
    sink: &mut W,
) -> Result<String, GenerationError> {
    let mut text = String::new();

    for line in reader.lines() {
        let line = line.map_err(|e| GenerationError::HttpClient(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let chunk: OllamaGenerateResponse = serde_json::from_str(&line)
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;
        if let Some(error) = chunk.error {
            return Err(GenerationError::OllamaError { status: 200, body: error });
        }

        let _ = sink.write_all(chunk.response.as_bytes());
        let _ = sink.flush();
        text.push_str(&chunk.response);

        if chunk.done {
            let _ = sink.write_all(b"\n");
            return Ok(text);
        }
    }

    Err(GenerationError::ResponseParsing(format!(
        "stream ended before completion after {} bytes",
        text.len()
    )))
}
