//! Configuration schema types for SpecNote.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults.

mod editor;
mod llm;
mod system;

pub use editor::*;
pub use llm::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for SpecNote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SpecnoteConfig {
    pub llm: LlmConfig,
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
}
