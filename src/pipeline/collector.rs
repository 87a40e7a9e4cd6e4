use std::sync::Arc;
use std::time::Instant;

use super::inference::{GenerationError, LlmGenerate, WorkerPool};
use super::prompt::{render_open_prompt, render_structured_prompt};
use super::report::AnswerRecord;

/// Shared handle to the process-wide model.
pub type SharedLlm = Arc<dyn LlmGenerate + Send + Sync>;

/// Asks the model every question about one document.
///
/// Free-text questions run one after another. Yes/no questions are all
/// submitted to the worker pool up front and collected in question order.
/// Any generation failure aborts the whole collection.
pub struct AnswerCollector {
    llm: SharedLlm,
    pool: WorkerPool,
}

impl AnswerCollector {
    pub fn new(llm: SharedLlm, pool: WorkerPool) -> Self {
        Self { llm, pool }
    }

    /// One record per question, in question order.
    pub async fn collect_open(
        &self,
        document_text: &str,
        questions: &[String],
    ) -> Result<Vec<AnswerRecord>, GenerationError> {
        let mut records = Vec::with_capacity(questions.len());

        for (index, question) in questions.iter().enumerate() {
            let prompt = render_open_prompt(document_text, question);
            let llm = Arc::clone(&self.llm);
            let started = Instant::now();

            let answer = tokio::task::spawn_blocking(move || llm.generate(&prompt))
                .await
                .map_err(|e| GenerationError::WorkerFailed(e.to_string()))??;

            tracing::info!(
                question_index = index,
                kind = "open",
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Generation complete"
            );
            records.push(AnswerRecord::new(question.clone(), answer));
        }

        Ok(records)
    }

    /// One record per question, in question order, whatever order the
    /// pool finishes them in.
    pub async fn collect_structured(
        &self,
        document_text: &str,
        questions: &[String],
    ) -> Result<Vec<AnswerRecord>, GenerationError> {
        let jobs = questions.iter().enumerate().map(|(index, question)| {
            let prompt = render_structured_prompt(document_text, question);
            let llm = Arc::clone(&self.llm);
            move || -> Result<String, GenerationError> {
                let started = Instant::now();
                let answer = llm.generate(&prompt)?;
                tracing::info!(
                    question_index = index,
                    kind = "structured",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generation complete"
                );
                Ok(answer)
            }
        });

        let answers = self.pool.run_ordered(jobs).await?;

        Ok(questions
            .iter()
            .cloned()
            .zip(answers)
            .map(|(question, answer)| AnswerRecord::new(question, answer))
            .collect())
    }
}
