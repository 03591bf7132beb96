//! Constants shared by the admission gate, the document writer and the HTTP layer.

/// Minimum accepted upload size in bytes.
///
/// Both the transport gate and the orchestrator read this value; never duplicate it.
pub const MIN_UPLOAD_SIZE_BYTES: u64 = 1024;

/// Media type of an OOXML word-processing document.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// File suffix of every stored output document.
pub const DOCX_EXTENSION: &str = ".docx";

/// Fixed part of the stored output filename, after the random token.
pub const OUTPUT_FILENAME_STEM: &str = "_output_document";

/// Path prefix of the download locator handed back to clients.
pub const DOWNLOAD_PATH_PREFIX: &str = "/api/files/download/";

/// Multipart field carrying the tone reference document.
pub const TONE_FILE_FIELD: &str = "toneFile";

/// Multipart field carrying the document to rewrite.
pub const CONTENT_FILE_FIELD: &str = "contentFile";
