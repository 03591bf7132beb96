//! Document processing module
//!
//! Input and output documents are OOXML word-processing packages: a zip archive whose
//! main part is `word/document.xml` in the WordprocessingML namespace.

pub mod extractor;
pub mod writer;

pub use extractor::{extract_text, DocumentExtractor};
pub use writer::render_document;

use tonewrite_core::AppError;

pub(crate) const WORDPROCESSING_NS: &[u8] =
    b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const WORDPROCESSING_STRICT_NS: &[u8] =
    b"http://purl.oclc.org/ooxml/wordprocessingml/main";
pub(crate) const DEFAULT_MAIN_PART: &str = "word/document.xml";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Not a valid document archive: {0}")]
    InvalidArchive(String),

    #[error("Document part missing: {0}")]
    MissingPart(String),

    #[error("Malformed document XML: {0}")]
    MalformedXml(String),

    /// A part inflates beyond the accepted size or ratio.
    #[error("Document part too large: {0}")]
    Oversized(String),

    #[error("Failed to render document: {0}")]
    Render(String),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Render(msg) => AppError::Unexpected(format!("Failed to render document: {}", msg)),
            other => AppError::CorruptDocument(other.to_string()),
        }
    }
}
