//! Minimal OOXML tag scanning shared by the Word and spreadsheet readers.
//!
//! The documents this crate reads only need element-and-attribute level
//! access to a handful of known, non-nested tags (`<w:t>`, `<row>`, `<c>`,
//! `<si>`, ...), so a string scan in the style of the pack's other OOXML
//! readers is used instead of a full XML parser.

/// One scanned element occurrence: its raw attribute text and inner markup.
#[derive(Debug, Clone, Copy)]
pub(super) struct Element<'a> {
    pub attrs: &'a str,
    pub inner: &'a str,
}

/// Collects every occurrence of `<name ...>...</name>` (or the self-closing
/// form) in document order.
///
/// Matching is purely lexical and assumes elements of the same name do not
/// nest, which holds for the tags this crate scans.
pub(super) fn elements<'a>(xml: &'a str, name: &str) -> Vec<Element<'a>> {
    let open = format!("<{name}");
    let close = format!("</{name}>");
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(rel) = xml[pos..].find(&open) {
        let start = pos + rel;
        let after_name = start + open.len();

        // Require a real tag boundary so "<c" does not match "<cols".
        match xml[after_name..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {}
            _ => {
                pos = after_name;
                continue;
            }
        }

        let Some(gt_rel) = xml[after_name..].find('>') else {
            break;
        };
        let gt = after_name + gt_rel;

        if xml[..gt].ends_with('/') {
            // Self-closing form carries attributes but no inner markup.
            found.push(Element {
                attrs: &xml[after_name..gt - 1],
                inner: "",
            });
            pos = gt + 1;
            continue;
        }

        let inner_start = gt + 1;
        let Some(close_rel) = xml[inner_start..].find(&close) else {
            break;
        };
        found.push(Element {
            attrs: &xml[after_name..gt],
            inner: &xml[inner_start..inner_start + close_rel],
        });
        pos = inner_start + close_rel + close.len();
    }

    found
}

/// Extracts an attribute value from an element's raw attribute text.
///
/// The attribute name must sit at a word boundary so that, for example,
/// looking up `Id` does not match `sheetId`.
pub(super) fn attr(attrs: &str, name: &str) -> Option<String> {
    let pattern = format!("{name}=\"");
    let mut search = 0;

    while let Some(rel) = attrs[search..].find(&pattern) {
        let start = search + rel;
        let value_start = start + pattern.len();
        let at_boundary =
            start == 0 || attrs[..start].ends_with(|c: char| c.is_whitespace());

        if at_boundary {
            let end = attrs[value_start..].find('"')?;
            return Some(unescape(&attrs[value_start..value_start + end]));
        }
        search = value_start;
    }

    None
}

/// Decodes the five predefined XML entities.
pub(super) fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
