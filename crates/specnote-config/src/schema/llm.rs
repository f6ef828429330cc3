//! Language-model provider configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model used when the configured model name is empty.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Environment variable consulted when no explicit key is configured.
pub const DEFAULT_CREDENTIAL_ENV: &str = "API_KEY";

/// Which completion backend serves requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted Gemini-compatible streaming endpoint.
    #[default]
    Remote,
    /// Local (Ollama-style) server. Not implemented.
    Local,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Remote => f.write_str("remote"),
            ProviderKind::Local => f.write_str("local"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "gemini" => Ok(ProviderKind::Remote),
            "local" | "ollama" => Ok(ProviderKind::Local),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Language-model configuration. Editable for the lifetime of the process.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Model identifier; empty selects [`DEFAULT_MODEL`].
    pub model: String,
    /// Per-session credential. Takes precedence over the environment.
    pub api_key: Option<String>,
    /// Endpoint override, e.g. a proxy or a local test server.
    pub base_url: Option<String>,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Name of the ambient credential variable.
    pub credential_env: String,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("credential_env", &self.credential_env)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Remote,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
        }
    }
}

impl LlmConfig {
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_credential_env(mut self, name: impl Into<String>) -> Self {
        self.credential_env = name.into();
        self
    }

    /// The model to request: the configured name, or [`DEFAULT_MODEL`] when blank.
    pub fn effective_model(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_MODEL
        } else {
            model
        }
    }
}
