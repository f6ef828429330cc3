use super::helpers::validate_range_f64;
use crate::schema::SpecnoteConfig;

pub(super) fn validate_llm(errors: &mut Vec<String>, config: &SpecnoteConfig) {
    let llm = &config.llm;

    validate_range_f64(errors, "llm.temperature", llm.temperature, 0.0, 2.0);

    if let Some(url) = llm.base_url.as_deref() {
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("llm.base_url = {url:?} must start with http:// or https://"));
        }
    }

    if llm.credential_env.trim().is_empty() {
        errors.push("llm.credential_env must not be empty".into());
    }
}
