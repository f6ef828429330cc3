pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, SpecnoteError};
pub use events::{EventBus, SessionEvent};
pub use id::MessageId;
pub use types::{ContextScope, SessionState};

pub type Result<T> = std::result::Result<T, SpecnoteError>;
