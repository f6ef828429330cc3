//! Line commands understood by the terminal host.

use specnote_common::ContextScope;
use specnote_config::ProviderKind;
use specnote_editor::InsertMode;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text: send as a prompt.
    Prompt(String),
    Select { start: usize, end: usize },
    Cursor(usize),
    Scope(ContextScope),
    Context,
    /// Apply the n-th most recent insertable reply (0 = latest).
    Apply { mode: InsertMode, nth: usize },
    Preview(String),
    Presets,
    Preset(usize),
    Provider(ProviderKind),
    Model(String),
    Key(String),
    Temperature(f64),
    Document,
    Transcript,
    Clear,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type a prompt to send it. Commands:
  :select <start> <end>      select a byte range of the document
  :cursor <offset>           place the cursor
  :scope none|selection|paragraph|full
  :context                   show the context that will be sent
  :insert|:replace|:append [n]  apply the n-th latest reply (default 0)
  :preview <prompt>          show the payload without sending
  :presets / :preset <n>     list or send a starter prompt
  :provider remote|local     :model <name>
  :key [value]               set or clear the session API key
  :temperature <value>
  :doc  :transcript  :clear  :help  :quit";

pub fn parse(line: &str) -> Result<Command, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Prompt(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim(), ""),
    };

    match name {
        "select" | "sel" => {
            let mut parts = arg.split_whitespace();
            let start = parse_offset(parts.next())?;
            let end = parse_offset(parts.next())?;
            Ok(Command::Select { start, end })
        }
        "cursor" => Ok(Command::Cursor(parse_offset(Some(arg))?)),
        "scope" => arg.parse().map(Command::Scope),
        "context" => Ok(Command::Context),
        "insert" | "replace" | "append" => {
            let mode = name.parse::<InsertMode>()?;
            let nth = if arg.is_empty() {
                0
            } else {
                parse_offset(Some(arg))?
            };
            Ok(Command::Apply { mode, nth })
        }
        "preview" => Ok(Command::Preview(arg.to_string())),
        "presets" => Ok(Command::Presets),
        "preset" => Ok(Command::Preset(parse_offset(Some(arg))?)),
        "provider" => arg.parse().map(Command::Provider),
        "model" => Ok(Command::Model(arg.to_string())),
        "key" => Ok(Command::Key(arg.to_string())),
        "temperature" | "temp" => arg
            .parse::<f64>()
            .map(Command::Temperature)
            .map_err(|e| format!("invalid temperature {arg:?}: {e}")),
        "doc" | "document" => Ok(Command::Document),
        "transcript" | "history" => Ok(Command::Transcript),
        "clear" => Ok(Command::Clear),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command :{other} (try :help)")),
    }
}

fn parse_offset(value: Option<&str>) -> Result<usize, String> {
    let value = value.ok_or_else(|| "missing number".to_string())?;
    value
        .parse::<usize>()
        .map_err(|e| format!("invalid number {value:?}: {e}"))
}
