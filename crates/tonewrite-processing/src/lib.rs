//! Tonewrite Processing Library
//!
//! Text extraction from uploaded word-processing documents, prompt composition,
//! and serialisation of generated text into the output document.

pub mod document;
pub mod output;
pub mod prompt;

// Re-export commonly used types
pub use document::{extract_text, render_document, DocumentError, DocumentExtractor};
pub use output::{OutputDocumentWriter, StoredDocument};
pub use prompt::PromptComposer;
