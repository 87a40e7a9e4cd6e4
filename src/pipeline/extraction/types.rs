use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Plain text of an uploaded document, produced once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    /// Per-page text concatenated in page order, with nothing inserted
    /// at page boundaries.
    pub text: String,
    pub page_count: usize,
}

impl DocumentText {
    /// Join per-page texts in order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut page_count = 0;
        for page in pages {
            text.push_str(page.as_ref());
            page_count += 1;
        }
        Self { text, page_count }
    }
}

/// PDF text extraction abstraction
pub trait PdfExtractor {
    /// Text of every page, in physical page order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;

    fn extract(&self, pdf_bytes: &[u8]) -> Result<DocumentText, ExtractionError> {
        Ok(DocumentText::from_pages(self.extract_pages(pdf_bytes)?))
    }

    fn extract_file(&self, path: &std::path::Path) -> Result<DocumentText, ExtractionError> {
        let bytes = std::fs::read(path)?;
        self.extract(&bytes)
    }
}
