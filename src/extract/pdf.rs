//! PDF text extraction.

use super::ExtractError;

/// Extracts the text of every page, in page order.
///
/// Page text comes straight from the PDF text extractor with no separator
/// re-inserted between pages; words at a page boundary may run together.
/// This mirrors the tool's inherited behavior and is intentional.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    Ok(pdf_extract::extract_text_from_mem(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_yield_error() {
        let result = extract_text(b"%PDF-not really a pdf at all");
        assert!(result.is_err());
    }

    #[test]
    fn empty_input_yields_error() {
        assert!(extract_text(b"").is_err());
    }
}
