//! SessionController: submit, stream, settle, and splice replies back.

use specnote_ai::{ChunkCallback, CompletionClient, CompletionError, SYSTEM_INSTRUCTION};
use specnote_common::{ContextScope, EventBus, MessageId, SessionEvent, SessionState};
use specnote_config::{EditorConfig, LlmConfig, SpecnoteConfig};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::context;
use crate::document::{DocumentStore, InsertMode, InsertPayload, WELCOME_DOCUMENT};
use crate::error::{EditorError, SubmitError};
use crate::transcript::{Message, Transcript};

use super::types::{
    AppState, PayloadPreview, Turn, TurnOutcome, LOCAL_PROVIDER_NOTICE, PRESET_PROMPTS,
};

pub struct SessionController {
    state: AppState,
    events: EventBus,
}

impl SessionController {
    pub fn new(llm: LlmConfig, editor: &EditorConfig, document: impl Into<String>) -> Self {
        Self {
            state: AppState {
                document: DocumentStore::new(document),
                transcript: Transcript::new(),
                scope: editor.initial_scope,
                session: SessionState::Idle,
                llm,
                preview_context_chars: editor.preview_context_chars as usize,
            },
            events: EventBus::default(),
        }
    }

    /// Controller seeded from loaded configuration.
    pub fn from_config(config: &SpecnoteConfig) -> Self {
        let document = if config.editor.welcome_document {
            WELCOME_DOCUMENT
        } else {
            ""
        };
        Self::new(config.llm.clone(), &config.editor, document)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn document(&self) -> &DocumentStore {
        &self.state.document
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn scope(&self) -> ContextScope {
        self.state.scope
    }

    pub fn session_state(&self) -> SessionState {
        self.state.session
    }

    pub fn config(&self) -> &LlmConfig {
        &self.state.llm
    }

    pub fn set_config(&mut self, llm: LlmConfig) {
        debug!(?llm, "assistant settings changed");
        self.state.llm = llm;
    }

    pub fn set_scope(&mut self, scope: ContextScope) {
        if self.state.scope != scope {
            self.state.scope = scope;
            self.events.publish(SessionEvent::ScopeChanged(scope));
        }
    }

    /// Record the user's selection.
    ///
    /// A non-empty selection switches the scope to `Selection`; an empty one
    /// switches it to `None`.
    pub fn select(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        let has_text = !self.state.document.select(start, end)?.text.is_empty();
        self.set_scope(if has_text {
            ContextScope::Selection
        } else {
            ContextScope::None
        });
        Ok(())
    }

    pub fn set_cursor(&mut self, offset: usize) -> Result<(), EditorError> {
        self.select(offset, offset)
    }

    /// Replace the document text as a user edit.
    pub fn set_document_text(&mut self, text: impl Into<String>) {
        self.state.document.set_text(text);
    }

    /// The context that would accompany a prompt submitted now.
    pub fn context(&self) -> String {
        context::resolve(
            self.state.scope,
            self.state.document.selection(),
            self.state.document.text(),
        )
    }

    /// Character count of [`Self::context`].
    pub fn context_len(&self) -> usize {
        self.context().chars().count()
    }

    pub fn presets(&self) -> &'static [&'static str] {
        &PRESET_PROMPTS
    }

    pub fn preset(&self, index: usize) -> Option<&'static str> {
        PRESET_PROMPTS.get(index).copied()
    }

    /// Describe the payload for `input` without sending anything.
    pub fn preview(&self, input: &str) -> PayloadPreview {
        let context = self.context();
        let context_len = context.chars().count();
        let context_excerpt = (!context.is_empty()).then(|| {
            let mut excerpt: String = context
                .chars()
                .take(self.state.preview_context_chars)
                .collect();
            if context_len > self.state.preview_context_chars {
                excerpt.push_str("...");
            }
            excerpt
        });

        PayloadPreview {
            system_instruction: SYSTEM_INSTRUCTION,
            context_excerpt,
            context_len,
            task: input.to_string(),
        }
    }

    /// Accept a prompt and open its turn.
    ///
    /// Appends the user message and an empty model placeholder, and leaves
    /// the session `Sending`. Refused while another turn is in flight or when
    /// the input is blank; a refusal changes nothing.
    pub fn submit(&mut self, input: &str) -> Result<Turn, SubmitError> {
        if self.state.session.is_busy() {
            debug!(state = ?self.state.session, "submit rejected: completion in flight");
            return Err(SubmitError::Busy);
        }
        if input.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }

        self.set_session_state(SessionState::Sending);
        let context = self.context();

        let user_id = self.state.transcript.append(Message::user(input));
        self.events.publish(SessionEvent::MessageAppended(user_id));

        let message_id = self.state.transcript.append(Message::model_placeholder());
        self.events
            .publish(SessionEvent::MessageAppended(message_id.clone()));

        info!(
            message_id = %message_id,
            scope = %self.state.scope,
            context_len = context.len(),
            "turn submitted"
        );

        Ok(Turn {
            message_id,
            task: input.to_string(),
            context,
            config: self.state.llm.clone(),
        })
    }

    /// Note that the completion call for the open turn has been issued.
    pub fn begin_streaming(&mut self) {
        if self.state.session == SessionState::Sending {
            self.set_session_state(SessionState::Streaming);
        }
    }

    /// Append a streamed chunk to the turn's placeholder.
    pub fn apply_chunk(&mut self, id: &MessageId, chunk: &str) {
        if self.state.transcript.append_chunk(id, chunk) {
            self.events.publish(SessionEvent::ChunkAppended {
                id: id.clone(),
                chunk: chunk.to_string(),
            });
        }
    }

    /// Settle a turn and return to `Idle`.
    ///
    /// Failures become an error-tagged placeholder; an unsupported provider
    /// becomes a plain informational reply.
    pub fn finish_turn(
        &mut self,
        id: &MessageId,
        result: Result<String, CompletionError>,
    ) -> TurnOutcome {
        let outcome = match result {
            Ok(text) => {
                if self.state.transcript.finish(id) {
                    self.events.publish(SessionEvent::MessageFinished(id.clone()));
                }
                info!(message_id = %id, len = text.len(), "turn completed");
                TurnOutcome::Completed { text }
            }
            Err(CompletionError::UnsupportedProvider(provider)) => {
                if self.state.transcript.complete_with(id, LOCAL_PROVIDER_NOTICE) {
                    self.events.publish(SessionEvent::MessageFinished(id.clone()));
                }
                info!(message_id = %id, %provider, "provider not supported");
                TurnOutcome::Unsupported
            }
            Err(error) => {
                let text = format!("Error: {error}");
                if self.state.transcript.mark_error(id, text.clone()) {
                    self.events.publish(SessionEvent::MessageFailed {
                        id: id.clone(),
                        error: text,
                    });
                }
                warn!(message_id = %id, %error, "turn failed");
                TurnOutcome::Failed { error }
            }
        };

        self.set_session_state(SessionState::Idle);
        outcome
    }

    /// Drive `turn` to completion, applying chunks as they arrive.
    pub async fn run_turn(&mut self, client: &CompletionClient, turn: Turn) -> TurnOutcome {
        let Turn {
            message_id,
            task,
            context,
            config,
        } = turn;

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let on_chunk: ChunkCallback = Box::new(move |chunk| {
            let _ = tx.send(chunk);
        });

        self.begin_streaming();
        let completion = client.stream_completion(&task, &context, &config, on_chunk);
        tokio::pin!(completion);

        let result = loop {
            tokio::select! {
                biased;
                Some(chunk) = rx.recv() => self.apply_chunk(&message_id, &chunk),
                result = &mut completion => break result,
            }
        };

        // Chunks delivered in the same poll as completion.
        while let Ok(chunk) = rx.try_recv() {
            self.apply_chunk(&message_id, &chunk);
        }

        self.finish_turn(&message_id, result)
    }

    /// Submit `input` and stream the reply.
    pub async fn ask(
        &mut self,
        client: &CompletionClient,
        input: &str,
    ) -> Result<TurnOutcome, SubmitError> {
        let turn = self.submit(input)?;
        Ok(self.run_turn(client, turn).await)
    }

    /// Splice a model reply into the document. The transcript is untouched.
    ///
    /// Returns the new cursor offset.
    pub fn apply_reply(&mut self, id: &MessageId, mode: InsertMode) -> Result<usize, EditorError> {
        let message = self
            .state
            .transcript
            .get(id)
            .ok_or_else(|| EditorError::UnknownMessage(id.clone()))?;
        if !message.is_insertable() {
            return Err(EditorError::NotInsertable(id.clone()));
        }

        let payload = InsertPayload {
            text: message.text.clone(),
            mode,
        };
        let cursor = self.state.document.apply(&payload)?;
        debug!(message_id = %id, %mode, cursor, "reply applied to document");
        self.events.publish(SessionEvent::DocumentEdited { cursor });
        Ok(cursor)
    }

    /// Drop every message. Chunks still in flight for dropped messages are ignored.
    pub fn clear_transcript(&mut self) {
        self.state.transcript.clear();
        self.events.publish(SessionEvent::TranscriptCleared);
    }

    fn set_session_state(&mut self, session: SessionState) {
        if self.state.session != session {
            self.state.session = session;
            self.events.publish(SessionEvent::StateChanged(session));
        }
    }
}
