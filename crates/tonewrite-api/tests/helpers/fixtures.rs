//! Test fixtures: in-memory .docx packages.

use std::io::{Cursor, Write};

use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str(&format!(
            "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape(paragraph)
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}<w:sectPr/></w:body></w:document>",
        body
    )
}

/// A .docx holding `paragraphs`, padded with an unreferenced part until it is at
/// least `min_size` bytes. Entries are stored uncompressed so the size is stable.
pub fn docx(paragraphs: &[&str], min_size: usize) -> Vec<u8> {
    let base = build(paragraphs, 0);
    if base.len() >= min_size {
        return base;
    }
    build(paragraphs, min_size - base.len())
}

fn build(paragraphs: &[&str], padding: usize) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);

    let document = document_xml(paragraphs);
    let mut parts = vec![
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", RELS.to_string()),
        ("word/document.xml", document),
    ];
    if padding > 0 {
        parts.push(("docProps/padding.xml", format!("<p>{}</p>", "x".repeat(padding))));
    }

    for (name, content) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// The smallest package text extraction accepts: a single deflated main part.
pub fn minimal_docx(paragraphs: &[&str]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document_xml(paragraphs).as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Reference document whose tone the output should take.
pub fn tone_docx() -> Vec<u8> {
    docx(
        &[
            "Hey folks!",
            "Quick heads-up: the coffee machine is fixed, so go wild.",
            "",
            "Cheers",
        ],
        2000,
    )
}

/// Document whose substance the output should keep.
pub fn content_docx() -> Vec<u8> {
    docx(
        &[
            "Dear colleagues,",
            "Please be advised that the quarterly review will take place on Friday.",
        ],
        2000,
    )
}
