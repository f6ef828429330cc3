//! The completion client: one streaming call per invocation, no retries.

use std::sync::Arc;

use futures_util::StreamExt;
use specnote_config::{LlmConfig, ProviderKind};
use tracing::{debug, warn};

use crate::credentials::resolve_api_key;
use crate::gemini::GeminiProvider;
use crate::prompt::build_prompt;
use crate::{CompletionError, CompletionProvider, CompletionRequest};

/// Receives each streamed fragment as it arrives.
pub type ChunkCallback = Box<dyn Fn(String) + Send + Sync>;

/// Drives a remote provider and accumulates its streamed reply.
#[derive(Clone)]
pub struct CompletionClient {
    remote: Arc<dyn CompletionProvider>,
}

impl CompletionClient {
    /// Client backed by the given remote provider.
    pub fn new(remote: Arc<dyn CompletionProvider>) -> Self {
        Self { remote }
    }

    /// Client backed by the Gemini provider.
    pub fn gemini() -> Self {
        Self::new(Arc::new(GeminiProvider::new()))
    }

    /// Stream a completion for `task` with optional document `context`.
    ///
    /// Calls `on_chunk` once per non-empty fragment, in provider order, and
    /// resolves with the concatenation of every fragment. Local providers and
    /// missing credentials fail before any request is issued.
    pub async fn stream_completion(
        &self,
        task: &str,
        context: &str,
        config: &LlmConfig,
        on_chunk: ChunkCallback,
    ) -> Result<String, CompletionError> {
        if config.provider != ProviderKind::Remote {
            return Err(CompletionError::UnsupportedProvider(config.provider));
        }

        let api_key = resolve_api_key(config.api_key.as_deref(), &config.credential_env)?;
        let request = CompletionRequest::new(config, build_prompt(task, context));

        debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            "starting completion stream"
        );

        let mut fragments = self.remote.stream(&api_key, &request).await.map_err(|e| {
            warn!(error = %e, "completion request failed");
            e
        })?;

        let mut full_text = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(|e| {
                warn!(error = %e, received = full_text.len(), "completion stream failed");
                e
            })?;
            if fragment.is_empty() {
                continue;
            }
            full_text.push_str(&fragment);
            on_chunk(fragment);
        }

        debug!(len = full_text.len(), "completion stream finished");
        Ok(full_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FragmentStream;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed script and records what it was asked.
    struct ScriptedProvider {
        items: Vec<Result<String, CompletionError>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, CompletionRequest)>>,
    }

    impl ScriptedProvider {
        fn new(items: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                items,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn stream(
            &self,
            api_key: &str,
            request: &CompletionRequest,
        ) -> Result<FragmentStream, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            Ok(Box::pin(futures_util::stream::iter(self.items.clone())))
        }
    }

    fn config() -> LlmConfig {
        LlmConfig::default()
            .with_api_key("session-key")
            .with_credential_env("SPECNOTE_TEST_COMPLETION_UNSET")
    }

    fn collector() -> (Arc<Mutex<Vec<String>>>, ChunkCallback) {
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let sink = chunks.clone();
        (chunks, Box::new(move |c| sink.lock().unwrap().push(c)))
    }

    #[tokio::test]
    async fn accumulates_fragments_and_reports_each() {
        let provider = ScriptedProvider::new(vec![
            Ok("Hel".into()),
            Ok("lo, ".into()),
            Ok("world".into()),
        ]);
        let client = CompletionClient::new(provider.clone());
        let (chunks, on_chunk) = collector();

        let text = client
            .stream_completion("Greet", "", &config(), on_chunk)
            .await
            .unwrap();

        assert_eq!(text, "Hello, world");
        assert_eq!(*chunks.lock().unwrap(), vec!["Hel", "lo, ", "world"]);
    }

    #[tokio::test]
    async fn sends_framed_prompt_and_resolved_key() {
        let provider = ScriptedProvider::new(vec![Ok("ok".into())]);
        let client = CompletionClient::new(provider.clone());
        let (_, on_chunk) = collector();

        client
            .stream_completion("Summarize", "# Title\nBody text.", &config(), on_chunk)
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        let (key, request) = &seen[0];
        assert_eq!(key, "session-key");
        assert_eq!(request.prompt, "Context:\n# Title\nBody text.\n\nTask:\nSummarize");
        assert_eq!(request.system_instruction, crate::SYSTEM_INSTRUCTION);
    }

    #[tokio::test]
    async fn missing_credential_makes_no_call() {
        let provider = ScriptedProvider::new(vec![Ok("unused".into())]);
        let client = CompletionClient::new(provider.clone());
        let (chunks, on_chunk) = collector();
        let config = config().with_api_key("");

        let result = client.stream_completion("Hi", "", &config, on_chunk).await;

        assert_eq!(result, Err(CompletionError::MissingCredential));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(chunks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_provider_is_unsupported_and_makes_no_call() {
        let provider = ScriptedProvider::new(vec![Ok("unused".into())]);
        let client = CompletionClient::new(provider.clone());
        let (_, on_chunk) = collector();
        let config = config().with_provider(ProviderKind::Local);

        let result = client.stream_completion("Hi", "", &config, on_chunk).await;

        assert_eq!(
            result,
            Err(CompletionError::UnsupportedProvider(ProviderKind::Local))
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mid_stream_error_propagates_after_earlier_chunks() {
        let provider = ScriptedProvider::new(vec![
            Ok("partial".into()),
            Err(CompletionError::Provider("connection reset".into())),
            Ok("never".into()),
        ]);
        let client = CompletionClient::new(provider.clone());
        let (chunks, on_chunk) = collector();

        let result = client.stream_completion("Hi", "", &config(), on_chunk).await;

        assert_eq!(
            result,
            Err(CompletionError::Provider("connection reset".into()))
        );
        assert_eq!(*chunks.lock().unwrap(), vec!["partial"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_fragments_are_skipped() {
        let provider = ScriptedProvider::new(vec![Ok(String::new()), Ok("x".into())]);
        let client = CompletionClient::new(provider);
        let (chunks, on_chunk) = collector();

        let text = client
            .stream_completion("Hi", "", &config(), on_chunk)
            .await
            .unwrap();

        assert_eq!(text, "x");
        assert_eq!(chunks.lock().unwrap().len(), 1);
    }
}
