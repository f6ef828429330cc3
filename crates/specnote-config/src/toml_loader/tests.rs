//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::ProviderKind;
use specnote_common::{ConfigError, ContextScope};
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_specnote_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[llm]
model = "gemini-2.0-flash"
temperature = 0.2

[editor]
initial_scope = "paragraph"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.llm.model, "gemini-2.0-flash");
    assert!((config.llm.temperature - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.editor.initial_scope, ContextScope::Paragraph);
    // Defaults preserved
    assert_eq!(config.llm.provider, ProviderKind::Remote);
    assert!(config.editor.welcome_document);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[llm]\ntemperature = 9.0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert!((config.llm.temperature - 9.0).abs() < f64::EPSILON);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("specnote").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.llm.model, "gemini-3-flash-preview");
    assert_eq!(config.llm.credential_env, "API_KEY");
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::SpecnoteConfig;

    let content = default_config_toml();
    assert!(content.starts_with("# SpecNote Configuration\n# Schema version 1\n"));
    let config: SpecnoteConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.editor.preview_context_chars, 100);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    // Headless CI may not expose a config directory.
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("specnote"));
        assert!(path_str.ends_with("config.toml"));
    }
}
