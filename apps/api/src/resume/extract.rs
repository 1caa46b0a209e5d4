use std::io::{Cursor, Read};

use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Path of the main body part inside a DOCX package.
const DOCX_DOCUMENT: &str = "word/document.xml";

/// Plain text of an uploaded resume, one paragraph per line.
pub fn extract_text(extension: &str, bytes: &[u8]) -> Result<String> {
    match extension {
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .context("Failed to extract text from PDF"),
        "docx" => extract_docx_text(bytes),
        other => bail!("Unsupported resume format: {other}"),
    }
}

fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("DOCX is not a valid zip archive")?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_DOCUMENT)
        .with_context(|| format!("DOCX has no {DOCX_DOCUMENT}"))?
        .read_to_string(&mut xml)
        .context("Failed to read DOCX document body")?;
    document_xml_text(&xml)
}

/// Collects `w:t` runs; `w:p` ends a line, `w:tab` and `w:br` map to tab and newline.
fn document_xml_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().context("Malformed DOCX document XML")? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().context("Bad entity in DOCX text")?)
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
