//! Session state and turn types.

use std::fmt;

use specnote_ai::CompletionError;
use specnote_common::{ContextScope, MessageId, SessionState};
use specnote_config::LlmConfig;

use crate::document::DocumentStore;
use crate::transcript::Transcript;

/// Starter prompts offered while the transcript is empty.
pub const PRESET_PROMPTS: [&str; 4] = [
    "Summarize this section",
    "Rewrite for clarity",
    "Convert to bullet list",
    "Critique this argument",
];

/// Reply shown when the local provider is selected.
pub const LOCAL_PROVIDER_NOTICE: &str =
    "Local provider support is a placeholder. Please use the remote provider.";

/// Everything the controller owns.
#[derive(Debug, Clone)]
pub struct AppState {
    pub document: DocumentStore,
    pub transcript: Transcript,
    pub scope: ContextScope,
    pub session: SessionState,
    pub llm: LlmConfig,
    pub preview_context_chars: usize,
}

/// An accepted submit, ready to be sent.
///
/// `context` and `config` are captured at submit time; later scope or
/// settings changes do not affect this turn. The session stays busy until
/// the turn is settled through `SessionController::run_turn` or
/// `SessionController::finish_turn`.
#[derive(Debug, Clone)]
#[must_use = "the session stays busy until the turn is run or finished"]
pub struct Turn {
    pub message_id: MessageId,
    pub task: String,
    pub context: String,
    pub config: LlmConfig,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed { text: String },
    /// The provider has no implementation; an informational reply was posted.
    Unsupported,
    Failed { error: CompletionError },
}

/// What would be sent for a prompt, without sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPreview {
    pub system_instruction: &'static str,
    /// Leading characters of the resolved context, `None` when it is empty.
    pub context_excerpt: Option<String>,
    pub context_len: usize,
    pub task: String,
}

impl fmt::Display for PayloadPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SYSTEM PROMPT (included implicitly)")?;
        writeln!(f, "{}", self.system_instruction)?;
        writeln!(f)?;
        writeln!(f, "USER PROMPT")?;
        match &self.context_excerpt {
            Some(excerpt) => {
                writeln!(f, "Context ({} chars): {excerpt}", self.context_len)?;
                write!(f, "Task: {}", self.task)
            }
            None => write!(f, "{}", self.task),
        }
    }
}
