//! Google Gemini streaming provider.
//!
//! Implements `CompletionProvider` against the Generative Language API's
//! `streamGenerateContent` method with `alt=sse`.

mod api;
mod client;

pub use client::{GeminiProvider, GEMINI_API_BASE};
