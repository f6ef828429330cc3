//! Gemini provider struct, request building, and frame parsing.

use crate::{CompletionError, CompletionRequest};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini streaming provider.
pub struct GeminiProvider {
    pub(crate) http: reqwest::Client,
}

impl GeminiProvider {
    pub fn new() -> Self {
        Self {
            // No overall timeout: a long reply streams for as long as it takes.
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    pub(crate) fn stream_url(request: &CompletionRequest) -> String {
        let base = request
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/');
        format!("{}/{}:streamGenerateContent?alt=sse", base, request.model)
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "generationConfig": {
                "temperature": request.temperature,
            }
        })
    }

    /// Extract the text carried by one SSE `data` frame.
    ///
    /// Returns `Ok(None)` for frames without text (usage-only or finish frames).
    pub(crate) fn parse_frame(data: &str) -> Result<Option<String>, CompletionError> {
        let json: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| CompletionError::Provider(format!("malformed stream frame: {e}")))?;

        if let Some(error) = json.get("error") {
            return Err(CompletionError::Provider(error_message(error)));
        }

        let mut text = String::new();
        if let Some(candidates) = json["candidates"].as_array() {
            for candidate in candidates {
                if let Some(parts) = candidate["content"]["parts"].as_array() {
                    for part in parts {
                        if let Some(t) = part["text"].as_str() {
                            text.push_str(t);
                        }
                    }
                }
            }
        }

        Ok((!text.is_empty()).then_some(text))
    }

    /// Human-readable message for a failed HTTP response.
    pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> CompletionError {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("error").map(error_message))
            .unwrap_or_else(|| body.trim().to_string());
        CompletionError::Provider(format!("HTTP {status}: {detail}"))
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn error_message(error: &serde_json::Value) -> String {
    error["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}
