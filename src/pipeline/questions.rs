use serde::{Deserialize, Serialize};

/// Questions answered in free text.
pub const DEFAULT_OPEN_QUESTIONS: [&str; 4] = [
    "What is the patient’s chief complaint?",
    "What treatment plan is the doctor suggesting?",
    "A list of allergies the patient has",
    "A list of medications the patient is taking, with any known side-effects",
];

/// Yes/no questions answered as JSON and folded into the overall score.
pub const DEFAULT_STRUCTURED_QUESTIONS: [&str; 9] = [
    "Does the patient have a family history of colon cancer in their first-degree relatives?",
    "Has the patient experienced minimal bright red blood per rectum?",
    "Has the patient had significant loss of blood?",
    "Does the patient have a history of skin problems?",
    "Has the patient used hydrocortisone cream for the haemorrhoids that they are currently experiencing?",
    "Were any high risk traits found on the patient’s genetic test?",
    "Has the patient had a colonoscopy in the last 5 years?",
    "Has the patient had any recent foreign travel?",
    "How long has the patient been known to healthcare services?",
];

/// The two ordered question lists a run asks about every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub open: Vec<String>,
    pub structured: Vec<String>,
}

impl Default for QuestionSet {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            structured: DEFAULT_STRUCTURED_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .collect(),
        }
    }
}

impl QuestionSet {
    pub fn new(open: Vec<String>, structured: Vec<String>) -> Self {
        Self { open, structured }
    }

    /// Both lists must be non-empty and contain no blank questions.
    pub fn validate(&self) -> Result<(), String> {
        for (name, list) in [("open", &self.open), ("structured", &self.structured)] {
            if list.is_empty() {
                return Err(format!("{name} question list is empty"));
            }
            if let Some(i) = list.iter().position(|q| q.trim().is_empty()) {
                return Err(format!("{name} question {i} is blank"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_four_open_and_nine_structured() {
        let set = QuestionSet::default();
        assert_eq!(set.open.len(), 4);
        assert_eq!(set.structured.len(), 9);
        assert_eq!(set.open[0], "What is the patient’s chief complaint?");
        assert_eq!(
            set.structured[8],
            "How long has the patient been known to healthcare services?"
        );
        assert!(set.validate().is_ok());
    }

    #[test]
    fn blank_question_is_invalid() {
        let set = QuestionSet::new(vec!["Q1".into(), "  ".into()], vec!["Q2".into()]);
        let err = set.validate().unwrap_err();
        assert!(err.contains("open question 1"));
    }

    #[test]
    fn empty_structured_list_is_invalid() {
        let set = QuestionSet::new(vec!["Q1".into()], vec![]);
        assert!(set.validate().is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let set: QuestionSet =
            serde_json::from_str(r#"{"open": ["a"], "structured": ["b", "c"]}"#).unwrap();
        assert_eq!(set.open, vec!["a"]);
        assert_eq!(set.structured, vec!["b", "c"]);
    }
}
