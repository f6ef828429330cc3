use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which portion of the document accompanies a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextScope {
    #[default]
    None,
    Selection,
    Paragraph,
    #[serde(rename = "full", alias = "full_document")]
    FullDocument,
}

impl ContextScope {
    /// Human-readable label for scope pickers.
    pub fn label(self) -> &'static str {
        match self {
            ContextScope::None => "None",
            ContextScope::Selection => "Selection",
            ContextScope::Paragraph => "Current Paragraph",
            ContextScope::FullDocument => "Full Document",
        }
    }
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContextScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ContextScope::None),
            "selection" | "sel" => Ok(ContextScope::Selection),
            "paragraph" | "para" => Ok(ContextScope::Paragraph),
            "full" | "full_document" | "document" | "doc" => Ok(ContextScope::FullDocument),
            other => Err(format!("unknown context scope: {other}")),
        }
    }
}

/// Lifecycle of the assistant session.
///
/// `Sending` is transient: it covers the window between accepting a submit
/// and issuing the completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    Sending,
    Streaming,
}

impl SessionState {
    /// Whether a completion is in flight.
    pub fn is_busy(self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}
