//! Context resolution: which slice of the document accompanies a prompt.

use specnote_common::ContextScope;

use crate::document::Selection;

const PARAGRAPH_BREAK: &str = "\n\n";

/// Resolve the context string for `scope`.
///
/// Pure and cheap; safe to call on every selection change.
pub fn resolve(scope: ContextScope, selection: Option<&Selection>, document: &str) -> String {
    match scope {
        ContextScope::None => String::new(),
        ContextScope::Selection => selection.map(|s| s.text.clone()).unwrap_or_default(),
        ContextScope::FullDocument => document.to_string(),
        ContextScope::Paragraph => match selection {
            Some(sel) => paragraph_around(document, sel.start, sel.end)
                .map(str::to_string)
                // Offsets from a different text: hand back the selection as-is.
                .unwrap_or_else(|| sel.text.clone()),
            // No cursor position yet: fall back to the (empty) selection text.
            None => String::new(),
        },
    }
}

/// The paragraph(s) spanning `[start, end)`, bounded by the nearest blank
/// lines on each side. The separators themselves are excluded, and a caret
/// on a blank line has no paragraph.
pub fn paragraph_around(document: &str, start: usize, end: usize) -> Option<&str> {
    if start > end || !document.is_char_boundary(start) || !document.is_char_boundary(end) {
        return None;
    }

    let bytes = document.as_bytes();
    let on_blank_line = start == end
        && start > 0
        && bytes[start - 1] == b'\n'
        && bytes.get(start) == Some(&b'\n');
    if on_blank_line {
        return Some("");
    }

    let from = document[..start]
        .rfind(PARAGRAPH_BREAK)
        .map(|i| i + PARAGRAPH_BREAK.len())
        .unwrap_or(0);
    let to = document[end..]
        .find(PARAGRAPH_BREAK)
        .map(|i| end + i)
        .unwrap_or(document.len());

    // A selection edge inside a newline run leaves part of a separator behind.
    Some(document[from..to].trim_matches('\n'))
}
