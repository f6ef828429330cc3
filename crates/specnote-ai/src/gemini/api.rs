//! CompletionProvider implementation for GeminiProvider.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::streaming::parse_sse;
use crate::{CompletionError, CompletionProvider, CompletionRequest, FragmentStream};

use super::client::GeminiProvider;

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn stream(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, CompletionError> {
        let body = Self::build_request_body(request);
        let url = Self::stream_url(request);

        debug!(model = %request.model, "Gemini API streaming request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Provider(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &text));
        }

        let byte_stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));

        let fragments = parse_sse(reader).filter_map(|event| async move {
            match event {
                Ok(event) => Self::parse_frame(&event.data).transpose(),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specnote_config::LlmConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: String,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n{body}"
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{addr}/v1beta/models"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request(base_url: &str) -> CompletionRequest {
        CompletionRequest::new(
            &LlmConfig::default()
                .with_model("gemini-test")
                .with_base_url(base_url),
            "Summarize",
        )
    }

    fn frame(text: &str) -> String {
        format!(
            "data: {}\r\n\r\n",
            serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
        )
    }

    #[tokio::test]
    async fn streams_fragments_in_order() {
        let body = format!(
            "{}{}data: {{\"usageMetadata\":{{\"promptTokenCount\":4}}}}\r\n\r\n{}",
            frame("Hel"),
            frame("lo, "),
            frame("world")
        );
        let (base, server) = serve_once("200 OK", body).await;

        let provider = GeminiProvider::new();
        let stream = provider.stream("test-key", &request(&base)).await.unwrap();
        let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect().await;
        assert_eq!(fragments, vec!["Hel", "lo, ", "world"]);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1beta/models/gemini-test:streamGenerateContent?alt=sse"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: test-key"));
        assert!(raw.contains("systemInstruction"));
        assert!(raw.contains("Summarize"));
    }

    #[tokio::test]
    async fn non_success_status_is_provider_error() {
        let body = r#"{"error":{"code":429,"message":"Resource exhausted"}}"#.to_string();
        let (base, server) = serve_once("429 Too Many Requests", body).await;

        let provider = GeminiProvider::new();
        let err = match provider.stream("test-key", &request(&base)).await {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert_eq!(
            err,
            CompletionError::Provider("HTTP 429 Too Many Requests: Resource exhausted".into())
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_frame_surfaces_on_stream() {
        let body = format!("{}data: {{oops\r\n\r\n", frame("partial"));
        let (base, server) = serve_once("200 OK", body).await;

        let provider = GeminiProvider::new();
        let items: Vec<_> = provider
            .stream("test-key", &request(&base))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(items[0], Ok("partial".to_string()));
        assert!(matches!(items[1], Err(CompletionError::Provider(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_provider_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = GeminiProvider::new();
        let result = provider
            .stream("test-key", &request(&format!("http://{addr}")))
            .await;
        match result {
            Err(CompletionError::Provider(msg)) => assert!(msg.starts_with("network error")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected a network error"),
        }
    }
}
