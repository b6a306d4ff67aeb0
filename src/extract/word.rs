//! Word (DOCX) paragraph text extraction.
//!
//! A DOCX file is a ZIP package whose main content lives in
//! `word/document.xml`. Paragraphs are `<w:p>` elements and the visible text
//! within them sits in `<w:t>` runs.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use super::{ExtractError, xml};

/// Extracts the text of every paragraph, in document order, one paragraph
/// per line.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractError::Malformed("word/document.xml not found".to_string()))?
        .read_to_string(&mut document_xml)?;

    Ok(paragraph_text(&document_xml))
}

/// Collects the `<w:t>` run text of each `<w:p>` paragraph.
fn paragraph_text(document_xml: &str) -> String {
    let paragraphs: Vec<String> = xml::elements(document_xml, "w:p")
        .iter()
        .map(|paragraph| {
            xml::elements(paragraph.inner, "w:t")
                .iter()
                .map(|run| xml::unescape(run.inner))
                .collect::<String>()
        })
        .collect();

    paragraphs.join("\n")
}
