use std::sync::Mutex;

use super::types::LlmGenerate;
use super::GenerationError;

type Responder = Box<dyn Fn(&str) -> Result<String, GenerationError> + Send + Sync>;

/// Mock LLM client for testing. Answers from a closure and records every prompt.
pub struct MockLlmClient {
    responder: Responder,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Always answer with the same text.
    pub fn new(response: &str) -> Self {
        let response = response.to_string();
        Self::from_fn(move |_| Ok(response.clone()))
    }

    /// Answer each prompt with a custom function.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail with an Ollama error whenever the prompt contains `needle`.
    pub fn failing_on(needle: &str, response: &str) -> Self {
        let needle = needle.to_string();
        let response = response.to_string();
        Self::from_fn(move |prompt| {
            if prompt.contains(&needle) {
                Err(GenerationError::OllamaError {
                    status: 500,
                    body: "simulated failure".into(),
                })
            } else {
                Ok(response.clone())
            }
        })
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LlmGenerate for MockLlmClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        (self.responder)(prompt)
    }
}
