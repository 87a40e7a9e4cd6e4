use super::types::PdfExtractor;
use super::ExtractionError;

/// Check the `%PDF` magic bytes (not the file extension or Content-Type header).
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if !is_pdf(pdf_bytes) {
            return Err(ExtractionError::NotPdf);
        }

        // pdf-extract panics on some malformed documents (e.g. a font
        // missing from the page resources).
        let pages = std::panic::catch_unwind(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        })
        .map_err(|panic| ExtractionError::PdfParsing(panic_message(panic.as_ref())))?
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        tracing::debug!(pages = pages.len(), "PDF text extracted");
        Ok(pages)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "PDF parser crashed".to_string())
}
