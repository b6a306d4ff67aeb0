//! Document content extraction for uploaded files.
//!
//! Dispatches on a closed [`DocumentFormat`] enum derived from the filename
//! extension (no content sniffing). PDF and Word documents normalize to flat
//! text; spreadsheets normalize to a per-sheet preview of the first
//! [`PREVIEW_ROWS`] data rows. Every decode failure surfaces as an
//! [`ExtractError`] at this boundary; extraction never panics past it.

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

mod pdf;
mod sheet;
mod word;
mod xml;

/// Number of data rows retained per spreadsheet sheet. Fixed, not
/// configurable.
pub const PREVIEW_ROWS: usize = 5;

/// Errors that can occur while extracting document content.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The filename extension maps to no supported format.
    #[error("Unsupported file format (expected .pdf, .docx, or .xlsx)")]
    UnsupportedFormat,

    /// The PDF decoder rejected the input.
    #[error("Failed to extract PDF text: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    /// The DOCX/XLSX container is not a readable ZIP package.
    #[error("Invalid document package: {0}")]
    Package(#[from] zip::result::ZipError),

    /// A package entry could not be read.
    #[error("Failed to read document entry: {0}")]
    Io(#[from] std::io::Error),

    /// The package is readable but missing required structure.
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Supported upload formats, decided by filename extension.
///
/// An unrecognized extension is an explicit `Unsupported` case dispatched to
/// an error, never silent empty output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    WordDocument,
    Spreadsheet,
    Unsupported,
}

impl DocumentFormat {
    /// Determines the format from a filename extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::WordDocument,
            "xlsx" => Self::Spreadsheet,
            _ => Self::Unsupported,
        }
    }

    /// Determines the format from a file path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unsupported)
    }
}

/// Preview of one spreadsheet sheet: header names plus the first
/// [`PREVIEW_ROWS`] data rows, cell order aligned to `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPreview {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Normalized extraction output, created per upload and held only for the
/// display cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    /// Flat text content (PDF pages or Word paragraphs, in source order).
    PlainText(String),
    /// Per-sheet previews in workbook sheet order.
    TabularPreview(Vec<SheetPreview>),
}

impl ExtractionResult {
    /// Renders the result as display text for the output panes.
    ///
    /// Tabular previews render as one `Sheet:` block per sheet with each
    /// preview row shown as `column: value` records.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::PlainText(content) => content.clone(),
            Self::TabularPreview(sheets) => {
                let mut out = String::new();
                for (i, sheet) in sheets.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    let _ = writeln!(out, "Sheet: {}", sheet.name);
                    for row in &sheet.rows {
                        let record = sheet
                            .columns
                            .iter()
                            .zip(row.iter())
                            .map(|(column, value)| format!("{column}: {value}"))
                            .collect::<Vec<_>>()
                            .join(", ");
                        let _ = writeln!(out, "  {record}");
                    }
                }
                out
            }
        }
    }
}

/// Extracts normalized content from file bytes of the declared format.
///
/// # Errors
///
/// Returns `ExtractError::UnsupportedFormat` for the `Unsupported` variant
/// and a format-specific error for any decode failure. Errors are values;
/// nothing panics past this function.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> Result<ExtractionResult, ExtractError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes).map(ExtractionResult::PlainText),
        DocumentFormat::WordDocument => word::extract_text(bytes).map(ExtractionResult::PlainText),
        DocumentFormat::Spreadsheet => {
            sheet::extract_preview(bytes).map(ExtractionResult::TabularPreview)
        }
        DocumentFormat::Unsupported => Err(ExtractError::UnsupportedFormat),
    }
}

/// Reads a file and extracts it according to its extension.
///
/// # Errors
///
/// Returns `ExtractError::Io` if the file cannot be read, otherwise the same
/// errors as [`extract`].
pub fn extract_file(path: impl AsRef<Path>) -> Result<ExtractionResult, ExtractError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    // Reject the extension before touching the filesystem.
    if format == DocumentFormat::Unsupported {
        return Err(ExtractError::UnsupportedFormat);
    }
    let bytes = std::fs::read(path)?;
    extract(&bytes, format)
}
