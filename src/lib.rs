pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::console::{ConsoleReporter, PresetInput, PromptInput};
pub use adapters::json::JsonLinesReporter;
pub use adapters::smtp::{RelayConfig, SmtpRelay};
pub use config::{toml_config::TomlConfig, NotifySettings};
pub use crate::core::engine::{CancelFlag, NotifyEngine};
pub use utils::error::{NotifyError, Result};
