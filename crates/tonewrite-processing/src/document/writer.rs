//! Serialisation of plain text into a minimal word-processing package.
//!
//! The whole text goes into one justified paragraph with 1.5 line spacing. Each
//! line becomes a run followed by a carriage return, so lines render as visual
//! lines inside that single paragraph.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use super::{DocumentError, DEFAULT_MAIN_PART};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// 240ths of a line; 360 is 1.5 lines.
const LINE_SPACING: &str = "360";

/// Lines of `text` as rendered: split on `\n`, trailing `\r` dropped, trailing
/// empty lines removed.
pub fn output_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }
    if lines.len() == 1 && lines[0].is_empty() {
        lines.clear();
    }
    lines
}

/// Render `text` into the bytes of a `.docx` package.
pub fn render_document(text: &str) -> Result<Vec<u8>, DocumentError> {
    let document_xml = document_xml(text)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        (DEFAULT_MAIN_PART, document_xml.as_slice()),
    ] {
        zip.start_file(name, options)
            .map_err(|e| DocumentError::Render(format!("{}: {}", name, e)))?;
        zip.write_all(content)
            .map_err(|e| DocumentError::Render(format!("{}: {}", name, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| DocumentError::Render(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn document_xml(text: &str) -> Result<Vec<u8>, DocumentError> {
    let mut writer = Writer::new(Vec::new());

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut document = BytesStart::new("w:document");
    document.push_attribute(("xmlns:w", W_NAMESPACE));
    emit(&mut writer, Event::Start(document))?;
    emit(&mut writer, Event::Start(BytesStart::new("w:body")))?;
    emit(&mut writer, Event::Start(BytesStart::new("w:p")))?;

    emit(&mut writer, Event::Start(BytesStart::new("w:pPr")))?;
    let mut spacing = BytesStart::new("w:spacing");
    spacing.push_attribute(("w:line", LINE_SPACING));
    spacing.push_attribute(("w:lineRule", "auto"));
    emit(&mut writer, Event::Empty(spacing))?;
    let mut jc = BytesStart::new("w:jc");
    jc.push_attribute(("w:val", "both"));
    emit(&mut writer, Event::Empty(jc))?;
    emit(&mut writer, Event::End(BytesEnd::new("w:pPr")))?;

    for line in output_lines(text) {
        emit(&mut writer, Event::Start(BytesStart::new("w:r")))?;
        for (i, segment) in line.split('\t').enumerate() {
            if i > 0 {
                emit(&mut writer, Event::Empty(BytesStart::new("w:tab")))?;
            }
            let clean = xml_safe(segment);
            let mut t = BytesStart::new("w:t");
            t.push_attribute(("xml:space", "preserve"));
            emit(&mut writer, Event::Start(t))?;
            emit(&mut writer, Event::Text(BytesText::new(&clean)))?;
            emit(&mut writer, Event::End(BytesEnd::new("w:t")))?;
        }
        emit(&mut writer, Event::Empty(BytesStart::new("w:cr")))?;
        emit(&mut writer, Event::End(BytesEnd::new("w:r")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("w:p")))?;
    emit(&mut writer, Event::Empty(BytesStart::new("w:sectPr")))?;
    emit(&mut writer, Event::End(BytesEnd::new("w:body")))?;
    emit(&mut writer, Event::End(BytesEnd::new("w:document")))?;

    Ok(writer.into_inner())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Render(e.to_string()))
}

/// Drop characters XML 1.0 cannot carry.
fn xml_safe(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}
