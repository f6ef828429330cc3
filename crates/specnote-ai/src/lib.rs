//! Completion engine for SpecNote.
//!
//! Provides the streaming completion client used by the assistant pane:
//! - Prompt assembly (system instruction + context + task)
//! - Credential resolution (explicit key, then one environment variable)
//! - Server-Sent Events parsing into a lazy stream of text fragments
//! - A Gemini `streamGenerateContent` provider behind the `CompletionProvider` trait

pub mod completion;
pub mod credentials;
pub mod gemini;
pub mod prompt;
pub mod streaming;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use specnote_config::{LlmConfig, ProviderKind};

pub use completion::{ChunkCallback, CompletionClient};
pub use gemini::GeminiProvider;
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION};

/// Ordered, finite, non-restartable sequence of text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

/// A backend able to open one streaming text-generation call.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue the request and return its fragment stream.
    ///
    /// Transport and status errors surface here; frame errors surface as
    /// `Err` items on the stream.
    async fn stream(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, CompletionError>;
}

/// Everything a provider needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: String,
    pub temperature: f64,
    pub base_url: Option<String>,
}

impl CompletionRequest {
    pub fn new(config: &LlmConfig, prompt: impl Into<String>) -> Self {
        Self {
            model: config.effective_model().to_string(),
            prompt: prompt.into(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: config.temperature,
            base_url: config
                .base_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("API key is missing. Configure one in the settings or set the credential environment variable.")]
    MissingCredential,
    #[error("{0}")]
    Provider(String),
    #[error("provider '{0}' is not supported")]
    UnsupportedProvider(ProviderKind),
}
