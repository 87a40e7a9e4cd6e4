use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::inference::GenerationOptions;
use crate::pipeline::questions::QuestionSet;

/// Application-level constants
pub const APP_NAME: &str = "MedEL";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medel_lib=info,medel=info,tower_http=info"
}

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "mistral-openorca";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8082;
const DEFAULT_OUTPUT_PATH: &str = "output.json";
const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Cannot read questions file {path}: {source}")]
    QuestionsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid questions file {path}: {reason}")]
    InvalidQuestions { path: PathBuf, reason: String },
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ollama_url: String,
    pub model: String,
    pub generation: GenerationOptions,
    /// Capacity of the worker pool used for structured questions.
    pub workers: usize,
    /// Echo partial tokens to stdout while generating.
    pub stream_tokens: bool,
    pub host: String,
    pub port: u16,
    pub output_path: PathBuf,
    pub questions: QuestionSet,
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            generation: GenerationOptions::default(),
            workers: 1,
            stream_tokens: true,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            questions: QuestionSet::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let ollama_url = match get("MEDEL_OLLAMA_URL") {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => {
                return Err(ConfigError::InvalidValue {
                    var: "MEDEL_OLLAMA_URL",
                    value: url,
                    expected: "a URL starting with http:// or https://",
                })
            }
            None => defaults.ollama_url,
        };

        let model = get("MEDEL_MODEL")
            .map(|m| m.trim().to_string())
            .unwrap_or(defaults.model);

        let generation = GenerationOptions {
            num_ctx: parse_var(&get, "MEDEL_NUM_CTX", defaults.generation.num_ctx)?,
            num_batch: parse_var(&get, "MEDEL_NUM_BATCH", defaults.generation.num_batch)?,
            num_gpu: parse_var(&get, "MEDEL_NUM_GPU", defaults.generation.num_gpu)?,
            seed: parse_var(&get, "MEDEL_SEED", defaults.generation.seed)?,
        };

        let workers: usize = parse_var(&get, "MEDEL_WORKERS", defaults.workers)?;
        if workers == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MEDEL_WORKERS",
                value: "0".into(),
                expected: "a worker count of at least 1",
            });
        }

        let questions = match get("MEDEL_QUESTIONS_FILE") {
            Some(path) => load_questions_file(PathBuf::from(path))?,
            None => defaults.questions,
        };

        let max_upload_mb: u64 =
            parse_var(&get, "MEDEL_MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?;

        Ok(Self {
            ollama_url,
            model,
            generation,
            workers,
            stream_tokens: parse_var(&get, "MEDEL_STREAM_TOKENS", defaults.stream_tokens)?,
            host: get("MEDEL_HOST").unwrap_or(defaults.host),
            port: parse_var(&get, "MEDEL_PORT", defaults.port)?,
            output_path: get("MEDEL_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            questions,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        })
    }

    /// Address the UI server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: "MEDEL_HOST",
            value: self.host.clone(),
            expected: "an IP address",
        })
    }
}

fn parse_var<G, T>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var,
            value: raw,
            expected: std::any::type_name::<T>(),
        }),
    }
}

fn load_questions_file(path: PathBuf) -> Result<QuestionSet, ConfigError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::QuestionsFile {
        path: path.clone(),
        source,
    })?;
    let questions: QuestionSet =
        serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidQuestions {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    questions
        .validate()
        .map_err(|reason| ConfigError::InvalidQuestions { path, reason })?;
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_reference_deployment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.port, 8082);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.workers, 1);
        assert_eq!(config.generation.num_ctx, 2048);
        assert_eq!(config.generation.num_batch, 512);
        assert_eq!(config.generation.num_gpu, 1);
        assert_eq!(config.generation.seed, 10);
        assert_eq!(config.output_path, PathBuf::from("output.json"));
        assert!(config.stream_tokens);
        assert_eq!(config.questions.open.len(), 4);
        assert_eq!(config.questions.structured.len(), 9);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MEDEL_OLLAMA_URL", "http://gpu-box:11434/"),
            ("MEDEL_MODEL", "medllama2"),
            ("MEDEL_NUM_CTX", "4096"),
            ("MEDEL_WORKERS", "3"),
            ("MEDEL_STREAM_TOKENS", "false"),
            ("MEDEL_PORT", "9000"),
            ("MEDEL_OUTPUT_PATH", "reports/latest.json"),
        ]))
        .unwrap();
        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.model, "medllama2");
        assert_eq!(config.generation.num_ctx, 4096);
        assert_eq!(config.workers, 3);
        assert!(!config.stream_tokens);
        assert_eq!(config.port, 9000);
        assert_eq!(config.output_path, PathBuf::from("reports/latest.json"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("MEDEL_PORT", "  ")])).unwrap();
        assert_eq!(config.port, 8082);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("MEDEL_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "MEDEL_PORT", .. }));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("MEDEL_WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "MEDEL_WORKERS", .. }));
    }

    #[test]
    fn url_without_scheme_is_rejected() {
        let err =
            AppConfig::from_lookup(lookup(&[("MEDEL_OLLAMA_URL", "localhost:11434")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "MEDEL_OLLAMA_URL", .. }));
    }

    #[test]
    fn questions_file_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(
            &path,
            r#"{"open": ["Who is the patient?"], "structured": ["Is the patient a smoker?"]}"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config =
            AppConfig::from_lookup(lookup(&[("MEDEL_QUESTIONS_FILE", path_str.as_str())])).unwrap();
        assert_eq!(config.questions.open, vec!["Who is the patient?"]);
        assert_eq!(config.questions.structured, vec!["Is the patient a smoker?"]);
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(&path, r#"{"open": [], "structured": ["Q?"]}"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let err = AppConfig::from_lookup(lookup(&[("MEDEL_QUESTIONS_FILE", path_str.as_str())]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidQuestions { .. }));
    }

    #[test]
    fn missing_questions_file_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[(
            "MEDEL_QUESTIONS_FILE",
            "/nonexistent/questions.json",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::QuestionsFile { .. }));
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8082");
    }

    #[test]
    fn app_name_is_medel() {
        assert_eq!(APP_NAME, "MedEL");
    }
}
