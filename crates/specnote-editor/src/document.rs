//! Document store: the edited text, the user's selection, and edit application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EditorError;

/// Text loaded when the editor starts without a document.
pub const WELCOME_DOCUMENT: &str = "# Welcome to SpecNote

This is a minimalist, split-view markdown editor designed for AI engineers.

## Features
- **Split View**: Edit on one side, collaborate with AI on the other.
- **Context Aware**: Send selections or the whole document to the LLM.
- **Clean Export**: All output respects strict structure.

## Try it out
1. Select this list with `:select`.
2. Ask the AI to \"Convert this list to a table\".
3. Splice the reply back with `:replace`.
";

/// A span of the document, in byte offsets, with its extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    /// Capture `[start, end)` of `document`.
    ///
    /// Offsets must satisfy `start <= end <= document.len()` and fall on
    /// character boundaries.
    pub fn capture(document: &str, start: usize, end: usize) -> Result<Self, EditorError> {
        let span = check_span(document, start, end)?;
        Ok(Self {
            start,
            end,
            text: document[span].to_string(),
        })
    }

    /// A collapsed selection (caret) at `offset`.
    pub fn cursor(document: &str, offset: usize) -> Result<Self, EditorError> {
        Self::capture(document, offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn check_span(
    document: &str,
    start: usize,
    end: usize,
) -> Result<std::ops::Range<usize>, EditorError> {
    let valid = start <= end
        && end <= document.len()
        && document.is_char_boundary(start)
        && document.is_char_boundary(end);
    if valid {
        Ok(start..end)
    } else {
        Err(EditorError::InvalidSelection {
            start,
            end,
            len: document.len(),
        })
    }
}

/// How a reply is spliced into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// Splice at the selection, replacing any selected range.
    Insert,
    /// Same splice as `Insert`; kept distinct for the action that triggered it.
    Replace,
    /// Add after a blank line at the end of the document.
    Append,
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::Insert => f.write_str("insert"),
            InsertMode::Replace => f.write_str("replace"),
            InsertMode::Append => f.write_str("append"),
        }
    }
}

impl FromStr for InsertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(InsertMode::Insert),
            "replace" => Ok(InsertMode::Replace),
            "append" => Ok(InsertMode::Append),
            other => Err(format!("unknown insert mode: {other}")),
        }
    }
}

/// Text to splice into the document, passed once from a reply action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertPayload {
    pub text: String,
    pub mode: InsertMode,
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub cursor: usize,
}

/// Apply `text` to `document` against the selection span `[start, end)`.
///
/// `Insert` and `Replace` splice at the span and leave the cursor after the
/// inserted text. `Append` ignores the span, adds `"\n\n" + text` at the end,
/// and leaves the cursor at the new end.
pub fn apply_edit(
    document: &str,
    (start, end): (usize, usize),
    text: &str,
    mode: InsertMode,
) -> Result<Edit, EditorError> {
    match mode {
        InsertMode::Insert | InsertMode::Replace => {
            let span = check_span(document, start, end)?;
            let mut out = String::with_capacity(document.len() - span.len() + text.len());
            out.push_str(&document[..span.start]);
            out.push_str(text);
            out.push_str(&document[span.end..]);
            Ok(Edit {
                text: out,
                cursor: start + text.len(),
            })
        }
        InsertMode::Append => {
            let out = format!("{document}\n\n{text}");
            let cursor = out.len();
            Ok(Edit { text: out, cursor })
        }
    }
}

/// The document and the selection captured against it.
///
/// Both live in one value so an edit always sees the selection that belongs
/// to the current text.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    text: String,
    selection: Option<Selection>,
}

impl DocumentStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The selection, or `None` before the user has placed a cursor.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Record a new selection. Invalid offsets leave the previous one in place.
    pub fn select(&mut self, start: usize, end: usize) -> Result<&Selection, EditorError> {
        let selection = Selection::capture(&self.text, start, end)?;
        Ok(self.selection.insert(selection))
    }

    /// Replace the text wholesale, as a user edit.
    ///
    /// A selection still valid for the new text keeps its offsets (its text is
    /// re-extracted); otherwise it collapses to a cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if let Some(old) = self.selection.take() {
            let selection = Selection::capture(&self.text, old.start, old.end)
                .unwrap_or_else(|_| Selection {
                    start: self.text.len(),
                    end: self.text.len(),
                    text: String::new(),
                });
            self.selection = Some(selection);
        }
    }

    /// Apply a payload against the current selection and return the new cursor.
    ///
    /// Without a selection, insertions land at the end of the document. The
    /// selection collapses to the returned cursor afterwards.
    pub fn apply(&mut self, payload: &InsertPayload) -> Result<usize, EditorError> {
        let span = self
            .selection
            .as_ref()
            .map(|s| (s.start, s.end))
            .unwrap_or((self.text.len(), self.text.len()));

        let edit = apply_edit(&self.text, span, &payload.text, payload.mode)?;
        self.text = edit.text;
        self.selection = Some(Selection {
            start: edit.cursor,
            end: edit.cursor,
            text: String::new(),
        });
        Ok(edit.cursor)
    }
}
