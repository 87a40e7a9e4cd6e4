pub mod types;
pub mod pdf;

pub use types::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a PDF document")]
    NotPdf,

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),
}
