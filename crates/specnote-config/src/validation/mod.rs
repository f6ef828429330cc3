//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod editor;
mod helpers;
mod llm;


use crate::schema::SpecnoteConfig;
use specnote_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SpecnoteConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    llm::validate_llm(&mut errors, config);
    editor::validate_editor(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
