use clap::Parser;

/// SpecNote: a split-view markdown editor with a streaming AI assistant.
#[derive(Parser, Debug)]
#[command(name = "specnote", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Start with the contents of this file instead of the welcome document.
    #[arg(short = 'd', long)]
    pub document: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
