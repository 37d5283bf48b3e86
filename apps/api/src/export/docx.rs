use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_TAIL: &str = "</w:body></w:document>";

/// Minimal OOXML package: one paragraph per non-blank line.
pub fn write_docx(text: &str) -> Result<Vec<u8>> {
    let mut body = String::from(DOCUMENT_HEAD);
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        body.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
        body.push_str(&escape(line));
        body.push_str("</w:t></w:r></w:p>");
    }
    body.push_str(DOCUMENT_TAIL);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/document.xml", body.as_str()),
    ] {
        zip.start_file(name, options)
            .with_context(|| format!("docx: failed to start {name}"))?;
        zip.write_all(contents.as_bytes())
            .with_context(|| format!("docx: failed to write {name}"))?;
    }

    let cursor = zip.finish().context("docx: failed to finish archive")?;
    Ok(cursor.into_inner())
}
