//! Overall score from the structured (yes/no) answers.
//!
//! Each answer is parsed as a JSON object. Answers that do not parse are
//! dropped from the average entirely: they count neither as "no" nor in the
//! denominator. Model output is often not JSON, so a drop is routine and is
//! only logged at debug level.

use serde_json::{Map, Value};

use super::report::AnswerRecord;

/// Highest confidence a model may report.
pub const MAX_CONFIDENCE: u8 = 10;

/// The fields of a structured answer that feed the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStructuredAnswer {
    /// Empty when the model gave no (string) decision.
    pub decision: String,
    /// Clamped to `0..=MAX_CONFIDENCE`.
    pub confidence: u8,
}

impl ParsedStructuredAnswer {
    pub fn is_yes(&self) -> bool {
        self.decision.to_lowercase() == "yes"
    }

    /// `confidence / 10` for a "yes", zero otherwise.
    pub fn weight(&self) -> f64 {
        if self.is_yes() {
            f64::from(self.confidence) / f64::from(MAX_CONFIDENCE)
        } else {
            0.0
        }
    }
}

/// Parse one raw answer. `None` means malformed: not a JSON object, or a
/// confidence that cannot be read as a number.
pub fn parse_structured_answer(answer: &str) -> Option<ParsedStructuredAnswer> {
    let object: Map<String, Value> = match serde_json::from_str(answer) {
        Ok(Value::Object(object)) => object,
        _ => return None,
    };

    let decision = match object.get("decision") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    let confidence = coerce_confidence(object.get("confidence"))?;

    Some(ParsedStructuredAnswer {
        decision,
        confidence: confidence.clamp(0, i64::from(MAX_CONFIDENCE)) as u8,
    })
}

/// Integer view of a confidence value. Missing or null reads as 0.
fn coerce_confidence(value: Option<&Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) => Some(0),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        Some(_) => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

/// Lazily parse the answers, silently skipping the malformed ones.
pub fn parsed_answers(
    records: &[AnswerRecord],
) -> impl Iterator<Item = ParsedStructuredAnswer> + '_ {
    records.iter().enumerate().filter_map(|(index, record)| {
        let parsed = parse_structured_answer(&record.answer);
        if parsed.is_none() {
            tracing::debug!(question_index = index, "Structured answer is not valid JSON, skipped");
        }
        parsed
    })
}

/// Weighted percentage of confident "yes" answers among the parseable ones.
///
/// Returns 0 when nothing parses. The result is always within `0..=100`
/// and does not depend on the order of `records`.
pub fn overall_score(records: &[AnswerRecord]) -> f64 {
    let mut parsed = 0usize;
    let mut yes_confidence = 0u64;
    for answer in parsed_answers(records) {
        parsed += 1;
        if answer.is_yes() {
            yes_confidence += u64::from(answer.confidence);
        }
    }

    if parsed == 0 {
        return 0.0;
    }

    let weight_sum = yes_confidence as f64 / f64::from(MAX_CONFIDENCE);
    weight_sum / parsed as f64 * 100.0
}
