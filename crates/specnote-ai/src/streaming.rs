//! Server-Sent Events (SSE) streaming parser.
//!
//! Turns any buffered async reader into a lazy stream of SSE events. The
//! stream yields one event per blank-line-terminated block, in arrival
//! order, and ends after the reader is exhausted or fails once.

use futures_util::stream::{self, Stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::CompletionError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, if the block carried an `event:` field.
    pub event: Option<String>,
    /// The event data; multi-line `data:` fields are joined with `\n`.
    pub data: String,
}

struct SseState<R> {
    lines: Lines<R>,
    event: Option<String>,
    data: String,
    done: bool,
}

impl<R> SseState<R> {
    fn take_event(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event,
            data: std::mem::take(&mut self.data),
        })
    }
}

/// Parse an SSE byte stream into events.
pub fn parse_sse<R>(reader: R) -> impl Stream<Item = Result<SseEvent, CompletionError>>
where
    R: AsyncBufRead + Unpin,
{
    let state = SseState {
        lines: reader.lines(),
        event: None,
        data: String::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        loop {
            match state.lines.next_line().await {
                Ok(Some(line)) => {
                    if line.is_empty() {
                        // Empty line = end of event
                        if let Some(event) = state.take_event() {
                            return Some((Ok(event), state));
                        }
                        continue;
                    }

                    if let Some(event_type) = line.strip_prefix("event:") {
                        state.event = Some(event_type.trim_start().to_string());
                    } else if let Some(data) = line.strip_prefix("data:") {
                        let data = data.strip_prefix(' ').unwrap_or(data);
                        if !state.data.is_empty() {
                            state.data.push('\n');
                        }
                        state.data.push_str(data);
                    }
                    // Ignore other fields (id:, retry:, comments)
                }
                Ok(None) => {
                    state.done = true;
                    // Flush an unterminated trailing event
                    return state.take_event().map(|event| (Ok(event), state));
                }
                Err(e) => {
                    state.done = true;
                    let err = CompletionError::Provider(format!("stream read failed: {e}"));
                    return Some((Err(err), state));
                }
            }
        }
    })
}
