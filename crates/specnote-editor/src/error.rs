use specnote_common::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("selection {start}..{end} is not valid for a document of {len} bytes")]
    InvalidSelection { start: usize, end: usize, len: usize },

    #[error("no message with id {0}")]
    UnknownMessage(MessageId),

    #[error("message {0} cannot be inserted into the document")]
    NotInsertable(MessageId),
}

/// Why a submit was refused. Refusals leave the transcript untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("prompt is empty")]
    EmptyInput,

    #[error("a completion is already in flight")]
    Busy,
}
