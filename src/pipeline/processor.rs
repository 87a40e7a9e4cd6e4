//! Document processing orchestrator.
//!
//! Single entry point that drives the full pipeline:
//! extract → open questions → structured questions → score → report file.
//!
//! The extractor and the model are injected, so the orchestrator runs
//! unchanged against mock implementations in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use super::collector::{AnswerCollector, SharedLlm};
use super::extraction::{DocumentText, ExtractionError, PdfExtractor};
use super::inference::{GenerationError, WorkerPool};
use super::questions::QuestionSet;
use super::report::{write_report, AnswerRecord, Report, ReportError};
use super::scoring::overall_score;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a request. No partial report is written.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Report failed: {0}")]
    Report(#[from] ReportError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// What a successful run returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub general_info: Vec<AnswerRecord>,
    pub specific_info: Vec<AnswerRecord>,
    pub overall_score: f64,
    pub report_path: String,
    pub page_count: usize,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct DocumentProcessor {
    extractor: Arc<dyn PdfExtractor + Send + Sync>,
    collector: AnswerCollector,
    questions: QuestionSet,
    output_path: PathBuf,
}

impl DocumentProcessor {
    pub fn new(
        extractor: Arc<dyn PdfExtractor + Send + Sync>,
        llm: SharedLlm,
        pool: WorkerPool,
        questions: QuestionSet,
        output_path: PathBuf,
    ) -> Self {
        Self {
            extractor,
            collector: AnswerCollector::new(llm, pool),
            questions,
            output_path,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// Full pipeline from uploaded PDF bytes.
    pub async fn process_bytes(
        &self,
        pdf_bytes: Vec<u8>,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        let span = tracing::info_span!(
            "process_document",
            request_id = %Uuid::new_v4(),
            bytes = pdf_bytes.len()
        );

        async move {
            let extractor = Arc::clone(&self.extractor);
            let document = tokio::task::spawn_blocking(move || extractor.extract(&pdf_bytes))
                .await
                .map_err(|e| ExtractionError::PdfParsing(e.to_string()))??;

            self.prepare_report(&document).await
        }
        .instrument(span)
        .await
    }

    /// Full pipeline from a PDF on disk.
    pub async fn process_file(&self, path: &Path) -> Result<ProcessingOutcome, ProcessingError> {
        let bytes = tokio::fs::read(path).await.map_err(ExtractionError::from)?;
        self.process_bytes(bytes).await
    }

    /// Ask every question about already-extracted text, score the
    /// structured answers, and write the report file.
    pub async fn prepare_report(
        &self,
        document: &DocumentText,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        tracing::info!(
            page_count = document.page_count,
            text_length = document.text.len(),
            "Document text extracted"
        );

        let general_info = self
            .collector
            .collect_open(&document.text, &self.questions.open)
            .await?;
        let specific_info = self
            .collector
            .collect_structured(&document.text, &self.questions.structured)
            .await?;

        let overall_score = overall_score(&specific_info);
        tracing::info!(overall_score, "Structured answers scored");

        let report = Report {
            general_info,
            specific_info,
            overall_score,
        };
        write_report(&report, &self.output_path)?;

        Ok(ProcessingOutcome {
            general_info: report.general_info,
            specific_info: report.specific_info,
            overall_score: report.overall_score,
            report_path: self.output_path.display().to_string(),
            page_count: document.page_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::pdf::tests::make_test_pdf;
    use crate::pipeline::extraction::PdfTextExtractor;
    use crate::pipeline::inference::MockLlmClient;
    use crate::pipeline::prompt::STRUCTURED_ANSWER_INSTRUCTION;
    use crate::pipeline::report::read_report;

    fn processor_with(mock: Arc<MockLlmClient>, output_path: PathBuf) -> DocumentProcessor {
        DocumentProcessor::new(
            Arc::new(PdfTextExtractor),
            mock,
            WorkerPool::new(1),
            QuestionSet::default(),
            output_path,
        )
    }

    fn document(text: &str) -> DocumentText {
        DocumentText {
            text: text.to_string(),
            page_count: 1,
        }
    }

    #[tokio::test]
    async fn full_run_has_one_record_per_question() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockLlmClient::new("free text, not json"));
        let processor = processor_with(mock.clone(), dir.path().join("output.json"));

        let outcome = processor.prepare_report(&document("Report")).await.unwrap();

        assert_eq!(outcome.general_info.len(), 4);
        assert_eq!(outcome.specific_info.len(), 9);
        assert_eq!(outcome.overall_score, 0.0);
        assert_eq!(mock.prompts().len(), 13);
    }

    #[tokio::test]
    async fn all_confident_yes_scores_hundred() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockLlmClient::from_fn(|prompt| {
            if prompt.ends_with(STRUCTURED_ANSWER_INSTRUCTION) {
                Ok(r#"{"decision": "yes", "confidence": 10, "justification": "x"}"#.into())
            } else {
                Ok("Abdominal pain.".into())
            }
        }));
        let processor = processor_with(mock, dir.path().join("output.json"));

        let outcome = processor.prepare_report(&document("Report")).await.unwrap();

        assert_eq!(outcome.overall_score, 100.0);
        assert!(outcome.general_info.iter().all(|r| r.answer == "Abdominal pain."));
    }

    #[tokio::test]
    async fn open_questions_are_asked_before_structured_ones() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockLlmClient::new("answer"));
        let processor = processor_with(mock.clone(), dir.path().join("output.json"));

        processor.prepare_report(&document("Report")).await.unwrap();

        let prompts = mock.prompts();
        assert!(prompts[..4].iter().all(|p| !p.ends_with(STRUCTURED_ANSWER_INSTRUCTION)));
        assert!(prompts[4..].iter().all(|p| p.ends_with(STRUCTURED_ANSWER_INSTRUCTION)));
    }

    #[tokio::test]
    async fn report_file_matches_returned_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let mock = Arc::new(MockLlmClient::from_fn(|prompt| {
            if prompt.contains("colonoscopy") {
                Ok(r#"{"decision": "no", "confidence": 8}"#.into())
            } else if prompt.ends_with(STRUCTURED_ANSWER_INSTRUCTION) {
                Ok(r#"{"decision": "yes", "confidence": 6}"#.into())
            } else {
                Ok("Some answer".into())
            }
        }));
        let processor = processor_with(mock, path.clone());

        let outcome = processor.prepare_report(&document("Report")).await.unwrap();
        let saved = read_report(&path).unwrap();

        assert_eq!(outcome.report_path, path.display().to_string());
        assert_eq!(saved.general_info, outcome.general_info);
        assert_eq!(saved.specific_info, outcome.specific_info);
        assert_eq!(saved.overall_score, outcome.overall_score);
        // 8 answers at 0.6, one "no": 4.8 / 9
        assert!((outcome.overall_score - 4.8 / 9.0 * 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn generation_failure_writes_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let mock = Arc::new(MockLlmClient::failing_on("recent foreign travel", "{}"));
        let processor = processor_with(mock, path.clone());

        let err = processor.prepare_report(&document("Report")).await.unwrap_err();

        assert!(matches!(err, ProcessingError::Generation(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn non_pdf_upload_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockLlmClient::new("unused"));
        let processor = processor_with(mock.clone(), dir.path().join("output.json"));

        let err = processor.process_bytes(b"hello".to_vec()).await.unwrap_err();

        assert!(matches!(err, ProcessingError::Extraction(ExtractionError::NotPdf)));
        assert!(mock.prompts().is_empty());
    }

    #[tokio::test]
    async fn pdf_text_reaches_every_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockLlmClient::new("answer"));
        let processor = processor_with(mock.clone(), dir.path().join("output.json"));

        let pdf = make_test_pdf(&["Hemorrhoids noted", "Plan follows"]);
        let expected = PdfTextExtractor.extract(&pdf).unwrap();
        let outcome = processor.process_bytes(pdf).await.unwrap();

        assert_eq!(outcome.page_count, 2);
        assert!(mock
            .prompts()
            .iter()
            .all(|p| p.starts_with(&format!("{}\n\n", expected.text))));
    }

    #[tokio::test]
    async fn process_file_reads_pdf_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("report.pdf");
        std::fs::write(&pdf_path, make_test_pdf(&["Report"])).unwrap();
        let mock = Arc::new(MockLlmClient::new("answer"));
        let processor = processor_with(mock, dir.path().join("output.json"));

        let outcome = processor.process_file(&pdf_path).await.unwrap();
        assert_eq!(outcome.page_count, 1);
    }

    #[tokio::test]
    async fn custom_question_set_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockLlmClient::new("answer"));
        let processor = DocumentProcessor::new(
            Arc::new(PdfTextExtractor),
            mock.clone(),
            WorkerPool::new(2),
            QuestionSet::new(vec!["Only open?".into()], vec!["Only structured?".into()]),
            dir.path().join("output.json"),
        );

        let outcome = processor.prepare_report(&document("Report")).await.unwrap();

        assert_eq!(outcome.general_info.len(), 1);
        assert_eq!(outcome.specific_info.len(), 1);
        assert_eq!(outcome.specific_info[0].question, "Only structured?");
        assert_eq!(mock.prompts().len(), 2);
    }
}
