//! Default TOML config template with inline documentation comments.

use crate::schema::CONFIG_SCHEMA_VERSION;

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    format!("# SpecNote Configuration\n# Schema version {CONFIG_SCHEMA_VERSION}\n{TEMPLATE_BODY}")
}

const TEMPLATE_BODY: &str = r##"# Only override what you want to change -- missing fields use defaults.

[llm]
# provider = "remote"            # remote, local (local is not implemented yet)
# model = "gemini-3-flash-preview"
# api_key = ""                   # empty = read the variable named by credential_env
# base_url = ""                  # endpoint override
# temperature = 0.7              # 0.0-2.0
# credential_env = "API_KEY"

[editor]
# initial_scope = "selection"    # none, selection, paragraph, full
# welcome_document = true
# preview_context_chars = 100    # 1-10000

[logging]
# level = "INFO"                 # DEBUG, INFO, WARNING, ERROR
"##;
