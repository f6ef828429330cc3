//! Line-based terminal host for a `SessionController`.
//!
//! The document is shown on demand with `:doc`; replies stream to stdout
//! as chunks arrive.

use std::io::Write;

use specnote_ai::CompletionClient;
use specnote_common::{MessageId, SessionEvent};
use specnote_editor::{Sender, SessionController, TurnOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::commands::{self, Command, HELP};

pub async fn run(mut controller: SessionController, client: CompletionClient) {
    let mut events = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "SpecNote ({} chars loaded). Type :help for commands.",
        controller.document().text().len()
    );
    print_presets(&controller);

    loop {
        prompt();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match commands::parse(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Prompt(text) => send(&mut controller, &client, &mut events, &text).await,
            Command::Preset(index) => match controller.preset(index) {
                Some(text) => send(&mut controller, &client, &mut events, text).await,
                None => println!("no preset #{index}"),
            },
            other => handle(&mut controller, other),
        }
        drain(&mut events);
    }

    info!("session ended");
}

fn handle(controller: &mut SessionController, command: Command) {
    match command {
        Command::Select { start, end } => match controller.select(start, end) {
            Ok(()) => println!("selected {start}..{end}, scope {}", controller.scope()),
            Err(e) => println!("{e}"),
        },
        Command::Cursor(offset) => match controller.set_cursor(offset) {
            Ok(()) => println!("cursor at {offset}"),
            Err(e) => println!("{e}"),
        },
        Command::Scope(scope) => {
            controller.set_scope(scope);
            println!("scope {scope} ({} chars)", controller.context_len());
        }
        Command::Context => {
            let context = controller.context();
            if context.is_empty() {
                println!("(no context, scope {})", controller.scope());
            } else {
                println!("{}\n{context}", context_banner(&context));
            }
        }
        Command::Apply { mode, nth } => {
            let Some(id) = controller.transcript().replies().nth(nth).map(|m| m.id.clone()) else {
                println!("no reply #{nth} to apply");
                return;
            };
            match controller.apply_reply(&id, mode) {
                Ok(cursor) => println!("{mode} done, cursor at {cursor}"),
                Err(e) => println!("{e}"),
            }
        }
        Command::Preview(text) => println!("{}", controller.preview(&text)),
        Command::Presets => print_presets(controller),
        Command::Provider(provider) => {
            let llm = controller.config().clone().with_provider(provider);
            controller.set_config(llm);
            println!("provider {provider}");
        }
        Command::Model(model) => {
            let llm = controller.config().clone().with_model(model);
            println!("model {}", llm.effective_model());
            controller.set_config(llm);
        }
        Command::Key(key) => {
            let mut llm = controller.config().clone();
            if key.is_empty() {
                llm.api_key = None;
                println!("API key cleared, using ${}", llm.credential_env);
            } else {
                llm = llm.with_api_key(key);
                println!("API key set for this session");
            }
            controller.set_config(llm);
        }
        Command::Temperature(temperature) => {
            if !(0.0..=2.0).contains(&temperature) {
                println!("temperature must be between 0.0 and 2.0");
                return;
            }
            let llm = controller.config().clone().with_temperature(temperature);
            controller.set_config(llm);
            println!("temperature {temperature}");
        }
        Command::Document => print_document(controller),
        Command::Transcript => print_transcript(controller),
        Command::Clear => {
            controller.clear_transcript();
            println!("transcript cleared");
        }
        Command::Help => println!("{HELP}"),
        Command::Prompt(_) | Command::Preset(_) | Command::Quit => {}
    }
}

/// Submit `text` and render chunks while the turn runs.
async fn send(
    controller: &mut SessionController,
    client: &CompletionClient,
    events: &mut broadcast::Receiver<SessionEvent>,
    text: &str,
) {
    let turn = match controller.submit(text) {
        Ok(turn) => turn,
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    let reply_id = turn.message_id.clone();
    drain(events);

    let outcome = {
        let run = controller.run_turn(client, turn);
        tokio::pin!(run);
        loop {
            tokio::select! {
                outcome = &mut run => break outcome,
                Ok(event) = events.recv() => render(&event, &reply_id),
            }
        }
    };
    while let Ok(event) = events.try_recv() {
        render(&event, &reply_id);
    }

    match outcome {
        TurnOutcome::Completed { text } => {
            println!();
            debug!(chars = text.len(), "reply complete");
        }
        TurnOutcome::Unsupported | TurnOutcome::Failed { .. } => {
            if let Some(message) = controller.transcript().get(&reply_id) {
                println!("{}", message.text);
            }
        }
    }
}

fn render(event: &SessionEvent, reply_id: &MessageId) {
    if let SessionEvent::ChunkAppended { id, chunk } = event {
        if id == reply_id {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        }
    }
}

/// Header shown above a context dump; sizes are in characters.
fn context_banner(context: &str) -> String {
    format!("--- {} chars ---", context.chars().count())
}

fn drain(events: &mut broadcast::Receiver<SessionEvent>) {
    while events.try_recv().is_ok() {}
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_presets(controller: &SessionController) {
    if !controller.transcript().is_empty() {
        return;
    }
    println!("Try a preset with :preset <n>:");
    for (index, preset) in controller.presets().iter().enumerate() {
        println!("  {index}. {preset}");
    }
}

fn print_document(controller: &SessionController) {
    let document = controller.document();
    println!("{}", document.text());
    match document.selection() {
        Some(selection) if selection.is_empty() => {
            println!("--- cursor at {} ---", selection.start)
        }
        Some(selection) => println!(
            "--- selection {}..{} ({} chars) ---",
            selection.start,
            selection.end,
            selection.text.len()
        ),
        None => println!("--- no selection ---"),
    }
}

fn print_transcript(controller: &SessionController) {
    for message in controller.transcript().messages() {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Model if message.is_error => "error",
            Sender::Model => "ai",
            Sender::System => "system",
        };
        println!("[{who}] {}", message.text);
    }
}
