//! API credential resolution.
//!
//! Resolution order:
//! 1. The explicit per-session key, when non-blank
//! 2. The environment variable named by `LlmConfig::credential_env`

use crate::CompletionError;

/// Resolve the key to send, failing before any network activity when none exists.
pub fn resolve_api_key(explicit: Option<&str>, env_var: &str) -> Result<String, CompletionError> {
    resolve_with(explicit, || std::env::var(env_var).ok())
}

fn resolve_with(
    explicit: Option<&str>,
    ambient: impl FnOnce() -> Option<String>,
) -> Result<String, CompletionError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    ambient()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(CompletionError::MissingCredential)
}
