//! Plain-text extraction from word-processing documents
//!
//! Each body-level paragraph contributes its visible text followed by one `\n`,
//! including empty paragraphs. Paragraphs nested in tables or text boxes are not
//! body-level and are skipped.

use std::io::{Cursor, Read, Seek};
use std::time::Instant;

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Reader};
use tonewrite_core::{AppError, UploadedFile};
use zip::ZipArchive;

use super::{DocumentError, DEFAULT_MAIN_PART, WORDPROCESSING_NS, WORDPROCESSING_STRICT_NS};

const PACKAGE_RELS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL_SUFFIX: &str = "/officeDocument";

/// Largest inflated size accepted for a single package part.
pub const MAX_DOCUMENT_PART_BYTES: u64 = 32 * 1024 * 1024;
/// Highest inflated/compressed ratio accepted once a part exceeds the grace size.
const MAX_INFLATE_RATIO: u64 = 100;
/// Parts smaller than this are never ratio-checked.
const INFLATE_GRACE_BYTES: u64 = 100 * 1024;

/// Extract the text of a document, one line per body paragraph.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::InvalidArchive(e.to_string()))?;

    let part = main_part_name(&mut archive)?;
    let xml = read_part(&mut archive, &part)?;

    paragraphs_text(&xml)
}

/// Locate the main document part through the package relationships, falling back
/// to the conventional location.
fn main_part_name<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, DocumentError> {
    let from_rels = match read_part(archive, PACKAGE_RELS) {
        Ok(rels) => office_document_target(&rels),
        Err(_) => None,
    };

    if let Some(target) = from_rels {
        if archive.by_name(&target).is_ok() {
            return Ok(target);
        }
    }

    if archive.by_name(DEFAULT_MAIN_PART).is_ok() {
        return Ok(DEFAULT_MAIN_PART.to_string());
    }

    Err(DocumentError::MissingPart(DEFAULT_MAIN_PART.to_string()))
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, DocumentError> {
    let entry = archive
        .by_name(name)
        .map_err(|_| DocumentError::MissingPart(name.to_string()))?;

    // Declared sizes come from the upload, so the bytes actually inflated are checked too.
    let compressed = entry.compressed_size().max(1);
    check_inflated(name, entry.size(), compressed)?;

    let mut raw = Vec::new();
    entry
        .take(MAX_DOCUMENT_PART_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| DocumentError::MalformedXml(format!("{}: {}", name, e)))?;
    check_inflated(name, raw.len() as u64, compressed)?;

    String::from_utf8(raw).map_err(|e| DocumentError::MalformedXml(format!("{}: {}", name, e)))
}

fn check_inflated(name: &str, inflated: u64, compressed: u64) -> Result<(), DocumentError> {
    if inflated > MAX_DOCUMENT_PART_BYTES {
        return Err(DocumentError::Oversized(format!(
            "{} inflates past {} bytes",
            name, MAX_DOCUMENT_PART_BYTES
        )));
    }
    if inflated > INFLATE_GRACE_BYTES && inflated / compressed > MAX_INFLATE_RATIO {
        return Err(DocumentError::Oversized(format!(
            "{} inflates {}x from {} bytes",
            name,
            inflated / compressed,
            compressed
        )));
    }
    Ok(())
}

fn office_document_target(rels: &str) -> Option<String> {
    let mut reader = Reader::from_str(rels);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    let value = match attr.unescape_value() {
                        Ok(v) => v.into_owned(),
                        Err(_) => continue,
                    };
                    match attr.key.as_ref() {
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }
                if let (Some(rel_type), Some(target)) = (rel_type, target) {
                    if rel_type.ends_with(OFFICE_DOCUMENT_REL_SUFFIX) {
                        return Some(target.trim_start_matches('/').to_string());
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn is_wordprocessing(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == WORDPROCESSING_NS || *n == WORDPROCESSING_STRICT_NS)
}

/// Text state of the body paragraph currently being read.
struct OpenParagraph {
    /// Element depth the paragraph was opened at
    depth: usize,
    text: String,
    /// Paragraphs nested inside this one (text boxes); their text is skipped
    nested: usize,
    runs: usize,
    in_text: bool,
}

impl OpenParagraph {
    fn collecting(&self) -> bool {
        self.nested == 0
    }

    fn in_run(&self) -> bool {
        self.nested == 0 && self.runs > 0
    }
}

fn paragraphs_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = NsReader::from_str(xml);
    let mut out = String::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut paragraph: Option<OpenParagraph> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| DocumentError::MalformedXml(e.to_string()))?;
        let word = is_wordprocessing(&ns);

        match event {
            Event::Start(e) => {
                match (word, e.local_name().as_ref()) {
                    (true, b"body") if body_depth.is_none() => body_depth = Some(depth),
                    (true, b"p") => match paragraph.as_mut() {
                        Some(p) => p.nested += 1,
                        None if body_depth.map(|b| b + 1) == Some(depth) => {
                            paragraph = Some(OpenParagraph {
                                depth,
                                text: String::new(),
                                nested: 0,
                                runs: 0,
                                in_text: false,
                            });
                        }
                        None => {}
                    },
                    (true, b"r") => {
                        if let Some(p) = paragraph.as_mut().filter(|p| p.collecting()) {
                            p.runs += 1;
                        }
                    }
                    (true, b"t") => {
                        if let Some(p) = paragraph.as_mut().filter(|p| p.collecting()) {
                            p.in_text = true;
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                match (word, e.local_name().as_ref()) {
                    (true, b"p") => {
                        let closes_body_paragraph = match paragraph.as_mut() {
                            Some(p) if p.nested > 0 => {
                                p.nested -= 1;
                                false
                            }
                            Some(p) => p.depth == depth,
                            None => false,
                        };
                        if closes_body_paragraph {
                            if let Some(p) = paragraph.take() {
                                out.push_str(&p.text);
                                out.push('\n');
                            }
                        }
                    }
                    (true, b"r") => {
                        if let Some(p) = paragraph.as_mut().filter(|p| p.in_run()) {
                            p.runs -= 1;
                        }
                    }
                    (true, b"t") => {
                        if let Some(p) = paragraph.as_mut() {
                            p.in_text = false;
                        }
                    }
                    (true, b"body") if body_depth == Some(depth) => break,
                    _ => {}
                }
            }
            Event::Empty(e) => match (word, e.local_name().as_ref()) {
                (true, b"p") if paragraph.is_none() && body_depth.map(|b| b + 1) == Some(depth) => {
                    out.push('\n');
                }
                (true, b"tab") => {
                    if let Some(p) = paragraph.as_mut().filter(|p| p.in_run()) {
                        p.text.push('\t');
                    }
                }
                (true, b"br") | (true, b"cr") => {
                    if let Some(p) = paragraph.as_mut().filter(|p| p.in_run()) {
                        p.text.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if let Some(p) = paragraph.as_mut().filter(|p| p.in_text && p.collecting()) {
                    let text = e
                        .unescape()
                        .map_err(|err| DocumentError::MalformedXml(err.to_string()))?;
                    p.text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

/// Async front for `extract_text`; parsing runs on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract(&self, file: &UploadedFile) -> Result<String, AppError> {
        let data: Bytes = file.data.clone();
        let start = Instant::now();

        let text = tokio::task::spawn_blocking(move || extract_text(&data))
            .await
            .map_err(|e| AppError::Unexpected(format!("Text extraction task failed: {}", e)))?
            .map_err(|e| {
                tracing::warn!(
                    role = %file.role,
                    filename = file.filename.as_deref().unwrap_or("-"),
                    error = %e,
                    "Document could not be parsed"
                );
                AppError::from(e)
            })?;

        tracing::debug!(
            role = %file.role,
            size_bytes = file.declared_size,
            text_chars = text.chars().count(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Extracted document text"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tonewrite_core::FileRole;
    use zip::write::{FileOptions, ZipWriter};

    const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
            W, inner
        )
    }

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn docx(inner: &str) -> Vec<u8> {
        package(&[("word/document.xml", &body(inner))])
    }

    #[test]
    fn test_paragraphs_in_order_with_separator() {
        let bytes = docx(
            r#"<w:p><w:r><w:t>First</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t xml:space="preserve"> part</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_text(&bytes).unwrap(), "First\nSecond part\n");
    }

    #[test]
    fn test_empty_paragraphs_still_separate() {
        let bytes = docx(r#"<w:p/><w:p><w:pPr/></w:p><w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        assert_eq!(extract_text(&bytes).unwrap(), "\n\nx\n");
    }

    #[test]
    fn test_empty_document_is_empty_string() {
        let bytes = docx("<w:sectPr/>");
        assert_eq!(extract_text(&bytes).unwrap(), "");
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let bytes = docx(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>a</w:t><w:tab/><w:t>b &amp; c</w:t><w:br/><w:t>d</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_text(&bytes).unwrap(), "a\tb & c\nd\n");
    }

    #[test]
    fn test_table_paragraphs_are_not_body_level() {
        let bytes = docx(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_text(&bytes).unwrap(), "before\nafter\n");
    }

    #[test]
    fn test_main_part_from_relationships() {
        let rels = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/main.xml"/></Relationships>"#;
        let bytes = package(&[
            ("_rels/.rels", rels),
            ("word/main.xml", &body("<w:p><w:r><w:t>moved</w:t></w:r></w:p>")),
        ]);
        assert_eq!(extract_text(&bytes).unwrap(), "moved\n");
    }

    #[test]
    fn test_foreign_namespace_text_ignored() {
        let inner = r#"<w:p><w:r><w:t>kept</w:t></w:r><x:t xmlns:x="urn:other">dropped</x:t></w:p>"#;
        let bytes = docx(inner);
        assert_eq!(extract_text(&bytes).unwrap(), "kept\n");
    }

    #[test]
    fn test_not_a_zip_is_invalid_archive() {
        let err = extract_text(&[0u8; 2048]).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidArchive(_)));
        assert_eq!(AppError::from(err).error_type(), "CorruptDocument");
    }

    #[test]
    fn test_zip_without_document_part() {
        let bytes = package(&[("hello.txt", "hi")]);
        assert!(matches!(
            extract_text(&bytes).unwrap_err(),
            DocumentError::MissingPart(_)
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let bytes = package(&[("word/document.xml", "<w:document xmlns:w=\"x\"><w:body></w:document>")]);
        assert!(matches!(
            extract_text(&bytes).unwrap_err(),
            DocumentError::MalformedXml(_)
        ));
    }

    #[test]
    fn test_highly_compressible_part_is_rejected() {
        let run = format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", "a".repeat(4 * 1024 * 1024));
        let bytes = docx(&run);
        assert!(bytes.len() < 64 * 1024);

        let err = extract_text(&bytes).unwrap_err();
        assert!(matches!(err, DocumentError::Oversized(_)), "{:?}", err);
        assert_eq!(AppError::from(err).error_type(), "CorruptDocument");
    }

    #[test]
    fn test_ordinary_compressed_document_is_accepted() {
        let paragraphs: String = (0..500)
            .map(|i| format!("<w:p><w:r><w:t>Paragraph {} of the weekly update.</w:t></w:r></w:p>", i))
            .collect();
        let text = extract_text(&docx(&paragraphs)).unwrap();
        assert_eq!(text.lines().count(), 500);
        assert!(text.starts_with("Paragraph 0 of the weekly update.\n"));
    }

    #[tokio::test]
    async fn test_extractor_runs_on_uploaded_file() {
        let file = UploadedFile::new(
            FileRole::Tone,
            docx("<w:p><w:r><w:t>Hello there.</w:t></w:r></w:p>"),
            None,
        );
        let text = DocumentExtractor::new().extract(&file).await.unwrap();
        assert_eq!(text, "Hello there.\n");
    }
}
