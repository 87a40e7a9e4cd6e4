use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One question with the model's raw answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
}

impl AnswerRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Everything a run produces, in the shape persisted to the report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub general_info: Vec<AnswerRecord>,
    pub specific_info: Vec<AnswerRecord>,
    pub overall_score: f64,
}

/// Serialize the report as JSON, replacing any previous file at `path`.
pub fn write_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec(report)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

/// Load a previously written report.
pub fn read_report(path: &Path) -> Result<Report, ReportError> {
    let raw = std::fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}
