//! Editor and assistant-pane settings.

use serde::{Deserialize, Serialize};
use specnote_common::ContextScope;

/// Editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Scope selected before the user touches the scope picker.
    pub initial_scope: ContextScope,
    /// Start with the welcome document instead of an empty one.
    pub welcome_document: bool,
    /// Context characters shown in payload previews (valid range: 1-10000).
    pub preview_context_chars: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_scope: ContextScope::Selection,
            welcome_document: true,
            preview_context_chars: 100,
        }
    }
}
