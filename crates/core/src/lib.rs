pub mod config;
pub mod record;

pub use config::SessionRange;
pub use record::{MalformedPolicy, RecordParser, SpeechRecord};

pub const PROJECT_NAME: &str = "snemovna";
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");
