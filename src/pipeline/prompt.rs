/// Instruction appended to free-text questions.
pub const OPEN_ANSWER_INSTRUCTION: &str = "Answer in a sentence or as a list";

/// Instruction appended to yes/no questions.
pub const STRUCTURED_ANSWER_INSTRUCTION: &str = "Answer precisely in json format with following fields - decision (string with value yes or no), confidence (integer between 0 and 10), and justification (one sentence)";

/// Build the prompt for a free-text question.
///
/// Plain substitution: the document text is inserted as-is, unescaped.
pub fn render_open_prompt(document_text: &str, question: &str) -> String {
    format!("{document_text}\n\n{question}\n\n{OPEN_ANSWER_INSTRUCTION}")
}

/// Build the prompt for a yes/no question that expects a JSON answer.
pub fn render_structured_prompt(document_text: &str, question: &str) -> String {
    format!("{document_text}\n\n{question}\n\n{STRUCTURED_ANSWER_INSTRUCTION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_prompt_layout() {
        let prompt = render_open_prompt("Report body", "What is the chief complaint?");
        assert_eq!(
            prompt,
            "Report body\n\nWhat is the chief complaint?\n\nAnswer in a sentence or as a list"
        );
    }

    #[test]
    fn structured_prompt_layout() {
        let prompt = render_structured_prompt("Report body", "Any recent travel?");
        assert!(prompt.starts_with("Report body\n\nAny recent travel?\n\n"));
        assert!(prompt.ends_with(
            "decision (string with value yes or no), confidence (integer between 0 and 10), and justification (one sentence)"
        ));
    }

    #[test]
    fn template_like_text_is_not_interpreted() {
        let doc = "Dose {question} and {document_text} verbatim";
        let prompt = render_open_prompt(doc, "Q?");
        assert!(prompt.starts_with("Dose {question} and {document_text} verbatim\n\nQ?"));
    }

    #[test]
    fn empty_document_still_renders() {
        assert_eq!(
            render_structured_prompt("", "Q?"),
            format!("\n\nQ?\n\n{STRUCTURED_ANSWER_INSTRUCTION}")
        );
    }
}
