pub mod config;
pub mod error;
pub mod project;
pub mod types;

pub use config::{GeneratorConfig, SessionLogConfig};
pub use error::SessionLogError;
pub use project::{resolve_project_name, UNKNOWN_PROJECT};
pub use types::{EventTime, Message, Role, SessionRecord, MAX_MESSAGE_CHARS};
