//! SpecNote editor core.
//!
//! Pairs a plain-text document with an assistant transcript:
//! - `document`: the text, the user's selection, and edit application
//! - `context`: which slice of the document accompanies a prompt
//! - `transcript`: the chat log, grown in place while replies stream
//! - `session`: the controller that ties them to a completion client

pub mod context;
pub mod document;
pub mod error;
pub mod session;
pub mod transcript;

pub use document::{
    apply_edit, DocumentStore, Edit, InsertMode, InsertPayload, Selection, WELCOME_DOCUMENT,
};
pub use error::{EditorError, SubmitError};
pub use session::{
    AppState, PayloadPreview, SessionController, Turn, TurnOutcome, PRESET_PROMPTS,
};
pub use transcript::{Message, Sender, Transcript};
