//! Spreadsheet (XLSX) preview extraction.
//!
//! An XLSX file is a ZIP package: `xl/workbook.xml` names the sheets in
//! workbook order, `xl/_rels/workbook.xml.rels` maps each sheet to its
//! worksheet part, and `xl/sharedStrings.xml` holds the shared string table
//! that string cells reference by index.
//!
//! Each sheet reduces to its header row plus the first [`PREVIEW_ROWS`] data
//! rows; everything past the preview window is never materialized.

use std::io::{Cursor, Read};

use zip::ZipArchive;
use zip::result::ZipError;

use super::{ExtractError, PREVIEW_ROWS, SheetPreview, xml};

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Extracts a preview for every sheet, in workbook sheet order.
pub(super) fn extract_preview(bytes: &[u8]) -> Result<Vec<SheetPreview>, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook = read_entry(&mut archive, "xl/workbook.xml")?
        .ok_or_else(|| ExtractError::Malformed("xl/workbook.xml not found".to_string()))?;
    let rels = read_entry(&mut archive, "xl/_rels/workbook.xml.rels")?;
    let shared = read_entry(&mut archive, "xl/sharedStrings.xml")?
        .map(|xml| shared_strings(&xml))
        .unwrap_or_default();

    let mut previews = Vec::new();
    for (index, sheet) in xml::elements(&workbook, "sheet").iter().enumerate() {
        let name = xml::attr(sheet.attrs, "name")
            .unwrap_or_else(|| format!("Sheet{}", index + 1));

        // Resolve the worksheet part through the relationship table, falling
        // back to the conventional part name when the table is absent.
        let target = xml::attr(sheet.attrs, "r:id")
            .and_then(|rid| rels.as_deref().and_then(|rels| relationship_target(rels, &rid)))
            .unwrap_or_else(|| format!("worksheets/sheet{}.xml", index + 1));
        let part = normalize_part_name(&target);

        let sheet_xml = read_entry(&mut archive, &part)?.ok_or_else(|| {
            ExtractError::Malformed(format!("worksheet part {part} not found"))
        })?;

        previews.push(sheet_preview(name, &sheet_xml, &shared));
    }

    Ok(previews)
}

/// Reads a package entry to a string, treating a missing entry as `None`.
fn read_entry(archive: &mut Archive, name: &str) -> Result<Option<String>, ExtractError> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut contents = String::new();
            entry.read_to_string(&mut contents)?;
            Ok(Some(contents))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Looks up a relationship target by its `Id`.
fn relationship_target(rels_xml: &str, rid: &str) -> Option<String> {
    xml::elements(rels_xml, "Relationship")
        .iter()
        .find(|rel| xml::attr(rel.attrs, "Id").as_deref() == Some(rid))
        .and_then(|rel| xml::attr(rel.attrs, "Target"))
}

/// Normalizes a relationship target to a full package part name.
///
/// Targets are usually relative to `xl/` ("worksheets/sheet1.xml") but may be
/// package-absolute ("/xl/worksheets/sheet1.xml").
fn normalize_part_name(target: &str) -> String {
    let target = target.trim_start_matches('/');
    if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Parses the shared string table: one entry per `<si>`, concatenating its
/// `<t>` runs (rich text splits a string across several runs).
fn shared_strings(shared_xml: &str) -> Vec<String> {
    xml::elements(shared_xml, "si")
        .iter()
        .map(|si| {
            xml::elements(si.inner, "t")
                .iter()
                .map(|t| xml::unescape(t.inner))
                .collect::<String>()
        })
        .collect()
}

/// Builds the preview for one worksheet.
///
/// The first row supplies column names (blank header cells fall back to the
/// spreadsheet column letter); at most [`PREVIEW_ROWS`] following rows are
/// kept, each aligned to the header width.
fn sheet_preview(name: String, sheet_xml: &str, shared: &[String]) -> SheetPreview {
    let mut rows_iter = xml::elements(sheet_xml, "row").into_iter();

    let Some(header_row) = rows_iter.next() else {
        return SheetPreview {
            name,
            columns: Vec::new(),
            rows: Vec::new(),
        };
    };

    let header_cells = row_cells(header_row.inner, shared);
    let width = header_cells
        .iter()
        .map(|(column, _)| column + 1)
        .max()
        .unwrap_or(0);

    let mut columns: Vec<String> = (0..width).map(column_letter).collect();
    for (column, value) in header_cells {
        if !value.is_empty() {
            columns[column] = value;
        }
    }

    let mut rows = Vec::new();
    for row in rows_iter.take(PREVIEW_ROWS) {
        let mut values = vec![String::new(); columns.len()];
        for (column, value) in row_cells(row.inner, shared) {
            if column < values.len() {
                values[column] = value;
            }
        }
        rows.push(values);
    }

    SheetPreview {
        name,
        columns,
        rows,
    }
}

/// Parses the cells of one row into `(column index, value)` pairs.
///
/// A cell without a reference attribute takes the position after the
/// previous cell, matching how writers omit references for dense rows.
fn row_cells(row_xml: &str, shared: &[String]) -> Vec<(usize, String)> {
    let mut cells = Vec::new();
    let mut next_column = 0;

    for cell in xml::elements(row_xml, "c") {
        let column = xml::attr(cell.attrs, "r")
            .and_then(|reference| column_index(&reference))
            .unwrap_or(next_column);
        next_column = column + 1;
        cells.push((column, cell_value(&cell, shared)));
    }

    cells
}

/// Resolves one cell's display value according to its type attribute.
fn cell_value(cell: &xml::Element, shared: &[String]) -> String {
    let cell_type = xml::attr(cell.attrs, "t");

    match cell_type.as_deref() {
        // Shared string: <v> holds an index into the shared string table.
        Some("s") => first_inner(cell.inner, "v")
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| shared.get(index).cloned())
            .unwrap_or_default(),
        // Inline string: the text lives in <is><t>...</t></is>.
        Some("inlineStr") => xml::elements(cell.inner, "is")
            .first()
            .map(|is| {
                xml::elements(is.inner, "t")
                    .iter()
                    .map(|t| xml::unescape(t.inner))
                    .collect::<String>()
            })
            .unwrap_or_default(),
        // Numbers, booleans, and formula strings all carry their value in <v>.
        _ => first_inner(cell.inner, "v")
            .map(|v| xml::unescape(&v))
            .unwrap_or_default(),
    }
}

/// Returns the inner text of the first `<name>` element, if any.
fn first_inner(xml_text: &str, name: &str) -> Option<String> {
    xml::elements(xml_text, name)
        .first()
        .map(|e| e.inner.to_string())
}

/// Converts a cell reference's letter prefix to a zero-based column index
/// ("A1" -> 0, "AB12" -> 27).
///
/// An absurd letter run that would overflow `usize` (seen in corrupt files)
/// yields `None`, so the cell falls back to a sequential position instead of
/// panicking.
fn column_index(reference: &str) -> Option<usize> {
    let mut index = 0usize;
    let mut seen_letter = false;

    for c in reference.chars() {
        if !c.is_ascii_alphabetic() {
            break;
        }
        seen_letter = true;
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    if seen_letter { Some(index - 1) } else { None }
}

/// Converts a zero-based column index to its spreadsheet letter name
/// (0 -> "A", 27 -> "AB").
fn column_letter(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push(b'A' + (remaining % 26) as u8);
        remaining /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_index_handles_single_and_double_letters() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("B2"), Some(1));
        assert_eq!(column_index("Z10"), Some(25));
        assert_eq!(column_index("AA1"), Some(26));
        assert_eq!(column_index("AB12"), Some(27));
        assert_eq!(column_index("123"), None);
    }

    #[test]
    fn oversized_reference_letter_runs_do_not_overflow() {
        assert_eq!(column_index("AAAAAAAAAAAAAAAA1"), None);
        assert_eq!(column_index(&format!("{}9", "Z".repeat(64))), None);
    }

    #[test]
    fn row_cells_treat_oversized_references_as_positionless() {
        // A letter run past any real column count reads as reference-less,
        // so the cell takes the next sequential position.
        let row = r#"<c r="AAAAAAAAAAAAAAAA1"><v>1</v></c><c r="B1"><v>2</v></c>"#;
        let cells = row_cells(row, &[]);
        assert_eq!(cells, vec![(0, "1".to_string()), (1, "2".to_string())]);
    }

    #[test]
    fn column_letter_is_inverse_of_column_index() {
        for index in [0, 1, 25, 26, 27, 51, 52, 701, 702] {
            let letter = column_letter(index);
            assert_eq!(column_index(&format!("{letter}1")), Some(index));
        }
    }

    #[test]
    fn shared_strings_concatenate_rich_text_runs() {
        let xml = "<sst><si><t>plain</t></si>\
                   <si><r><t>rich </t></r><r><t>text</t></r></si></sst>";
        assert_eq!(shared_strings(xml), vec!["plain", "rich text"]);
    }

    #[test]
    fn row_cells_resolve_shared_and_numeric_values() {
        let shared = vec!["Alice".to_string()];
        let row = r#"<c r="A2" t="s"><v>0</v></c><c r="B2"><v>30</v></c>"#;
        let cells = row_cells(row, &shared);
        assert_eq!(
            cells,
            vec![(0, "Alice".to_string()), (1, "30".to_string())]
        );
    }

    #[test]
    fn row_cells_without_references_take_sequential_positions() {
        let row = "<c><v>10</v></c><c><v>20</v></c><c><v>30</v></c>";
        let cells = row_cells(row, &[]);
        assert_eq!(
            cells,
            vec![
                (0, "10".to_string()),
                (1, "20".to_string()),
                (2, "30".to_string())
            ]
        );
    }

    #[test]
    fn inline_string_cells_resolve_without_shared_table() {
        let row = r#"<c r="A1" t="inlineStr"><is><t>inline value</t></is></c>"#;
        let cells = row_cells(row, &[]);
        assert_eq!(cells, vec![(0, "inline value".to_string())]);
    }

    #[test]
    fn sheet_preview_caps_data_rows_at_preview_size() {
        let mut xml = String::from(r#"<row r="1"><c r="A1" t="inlineStr"><is><t>n</t></is></c></row>"#);
        for r in 2..=11 {
            xml.push_str(&format!(r#"<row r="{r}"><c r="A{r}"><v>{r}</v></c></row>"#));
        }

        let preview = sheet_preview("Sheet1".to_string(), &xml, &[]);
        assert_eq!(preview.columns, vec!["n"]);
        assert_eq!(preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(preview.rows[0], vec!["2"]);
        assert_eq!(preview.rows[4], vec!["6"]);
    }

    #[test]
    fn sheet_preview_pads_sparse_rows_to_header_width() {
        let xml = r#"<row r="1"><c r="A1" t="inlineStr"><is><t>a</t></is></c><c r="B1" t="inlineStr"><is><t>b</t></is></c></row><row r="2"><c r="B2"><v>only-b</v></c></row>"#;
        let preview = sheet_preview("S".to_string(), xml, &[]);
        assert_eq!(preview.columns, vec!["a", "b"]);
        assert_eq!(preview.rows, vec![vec!["".to_string(), "only-b".to_string()]]);
    }

    #[test]
    fn blank_header_cells_fall_back_to_column_letters() {
        let xml = r#"<row r="1"><c r="B1" t="inlineStr"><is><t>named</t></is></c></row><row r="2"><c r="A2"><v>1</v></c><c r="B2"><v>2</v></c></row>"#;
        let preview = sheet_preview("S".to_string(), xml, &[]);
        assert_eq!(preview.columns, vec!["A", "named"]);
    }

    #[test]
    fn empty_sheet_yields_empty_preview() {
        let preview = sheet_preview("Empty".to_string(), "<sheetData></sheetData>", &[]);
        assert!(preview.columns.is_empty());
        assert!(preview.rows.is_empty());
    }

    #[test]
    fn normalize_part_name_handles_relative_and_absolute_targets() {
        assert_eq!(
            normalize_part_name("worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            normalize_part_name("/xl/worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
    }
}
