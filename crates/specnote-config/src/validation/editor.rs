use super::helpers::validate_range;
use crate::schema::SpecnoteConfig;

pub(super) fn validate_editor(errors: &mut Vec<String>, config: &SpecnoteConfig) {
    validate_range(
        errors,
        "editor.preview_context_chars",
        config.editor.preview_context_chars,
        1,
        10_000,
    );
}
