mod cli;
mod commands;
mod repl;

use std::path::Path;

use specnote_ai::CompletionClient;
use specnote_common::ConfigError;
use specnote_config::{config_to_json, SpecnoteConfig};
use specnote_editor::SessionController;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

/// Turn a bare level like `debug` into a `specnote=debug` directive.
fn log_directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("specnote={level}")
    }
}

fn main() {
    load_dotenv();

    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => specnote_config::load_config_from(Path::new(path)),
        None => specnote_config::load_config(),
    };
    let config_directive = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("specnote=info");

    let directive = args
        .log_level
        .as_deref()
        .map(log_directive)
        .unwrap_or_else(|| config_directive.to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    info!("SpecNote starting");

    let result = prepare(&args, loaded).and_then(|(controller, runtime)| {
        runtime.block_on(repl::run(controller, CompletionClient::gemini()));
        Ok(())
    });
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }

    info!("SpecNote exiting");
}

/// Settle the configuration, seed the controller, and build the runtime.
///
/// A config file named with `--config` must load; the default one falls back
/// to built-in settings.
fn prepare(
    args: &cli::Args,
    loaded: Result<SpecnoteConfig, ConfigError>,
) -> specnote_common::Result<(SessionController, Runtime)> {
    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => {
            warn!("Failed to load config: {e}, using defaults");
            SpecnoteConfig::default()
        }
    };
    debug!(config = %config_to_json(&config), "effective config");

    let mut controller = SessionController::from_config(&config);
    if let Some(path) = &args.document {
        let text = std::fs::read_to_string(path).map_err(|e| {
            error!(path = %path, "Failed to read document");
            e
        })?;
        info!(path = %path, chars = text.len(), "document loaded");
        controller.set_document_text(text);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok((controller, runtime))
}
