use std::io::{Cursor, Read};

use anyhow::{anyhow, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Pulls paragraph text out of `word/document.xml`.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let mut zip =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| anyhow!("invalid docx zip: {e}"))?;

    let mut xml = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| anyhow!("docx missing word/document.xml"))?
        .read_to_string(&mut xml)
        .map_err(|e| anyhow!("docx document.xml read failed: {e}"))?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut out = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"br" | b"cr" => out.push('\n'),
                b"tab" => out.push('\t'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| anyhow!("docx xml unescape failed: {e}"))?;
                out.push_str(&text);
            }
            Ok(Event::End(e)) => {
                if local_name(e.name().as_ref()) == b"p" {
                    out.push('\n');
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(anyhow!("docx xml parse failed: {e}")),
        }
        buf.clear();
    }

    Ok(out)
}

/// Best-effort text recovery from a legacy binary `.doc`: keeps runs of
/// at least four printable characters.
pub fn scan_printable_runs(bytes: &[u8]) -> String {
    const MIN_RUN: usize = 4;

    let mut lines = Vec::new();
    let mut current = String::new();
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            current.push(b as char);
        } else {
            if current.trim().len() >= MIN_RUN {
                lines.push(current.trim().to_string());
            }
            current.clear();
        }
    }
    if current.trim().len() >= MIN_RUN {
        lines.push(current.trim().to_string());
    }
    lines.join("\n")
}
