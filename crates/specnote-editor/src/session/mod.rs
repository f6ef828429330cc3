//! Assistant session: turns context + prompt into a streamed transcript reply.
//!
//! A `SessionController` owns the document, transcript, scope, and state.
//! Every mutation goes through it, so hosts that move the completion onto
//! another task feed chunks back via `apply_chunk` / `finish_turn` rather
//! than touching shared state.

mod controller;
mod types;


pub use controller::SessionController;
pub use types::{
    AppState, PayloadPreview, Turn, TurnOutcome, LOCAL_PROVIDER_NOTICE, PRESET_PROMPTS,
};
