//! Output file naming.

use tonewrite_core::constants::{DOCX_EXTENSION, OUTPUT_FILENAME_STEM};
use uuid::Uuid;

/// `<uuid-v4>_output_document.docx`
///
/// A fresh random v4 identifier per call, so concurrent requests never share a name.
pub fn generate_output_filename() -> String {
    format!("{}{}{}", Uuid::new_v4(), OUTPUT_FILENAME_STEM, DOCX_EXTENSION)
}

/// Reject anything that is not a single plain file name.
pub fn validate_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && !key.contains("..")
        && !key.contains('/')
        && !key.contains('\\')
        && !key.contains('\0')
}
