pub mod toml_config;

use crate::adapters::smtp::{RelayConfig, DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT};
use crate::core::notifier::{DEFAULT_SUBJECT, DEFAULT_TEMPLATE, NAME_PLACEHOLDER};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "roster-notify")]
#[command(about = "Email students whose completion percentage is zero")]
pub struct CliConfig {
    /// Sender address, also used as the relay login
    #[arg(long)]
    pub sender: String,

    /// App password; prompted for when omitted
    #[arg(long)]
    pub credential: Option<String>,

    /// Roster spreadsheet; prompted for when omitted
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long, default_value = DEFAULT_SUBJECT)]
    pub subject: String,

    /// Plain-text body template containing {student_name}
    #[arg(long)]
    pub template_file: Option<String>,

    #[arg(long, default_value = DEFAULT_RELAY_HOST)]
    pub relay_host: String,

    #[arg(long, default_value_t = DEFAULT_RELAY_PORT)]
    pub relay_port: u16,

    /// List the students that would be emailed without sending anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn to_settings(&self) -> Result<NotifySettings> {
        let template = match &self.template_file {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_TEMPLATE.to_string(),
        };

        Ok(NotifySettings {
            sender_address: self.sender.trim().to_string(),
            subject: self.subject.clone(),
            template,
            relay: RelayConfig {
                host: self.relay_host.clone(),
                port: self.relay_port,
            },
        })
    }
}

/// 寄送流程的完整設定；憑證與名冊來源由 `InputProvider` 提供
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifySettings {
    pub sender_address: String,
    pub subject: String,
    pub template: String,
    pub relay: RelayConfig,
}

impl NotifySettings {
    pub fn new(sender_address: impl Into<String>) -> Self {
        Self {
            sender_address: sender_address.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            relay: RelayConfig::default(),
        }
    }
}

impl ConfigProvider for NotifySettings {
    fn sender_address(&self) -> &str {
        &self.sender_address
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn template(&self) -> &str {
        &self.template
    }
}

impl Validate for NotifySettings {
    fn validate(&self) -> Result<()> {
        validate_message_settings(&self.sender_address, &self.subject, &self.template, &self.relay)
    }
}

pub(crate) fn validate_message_settings(
    sender_address: &str,
    subject: &str,
    template: &str,
    relay: &RelayConfig,
) -> Result<()> {
    validation::validate_email_address("sender_address", sender_address)?;
    validation::validate_non_empty_string("subject", subject)?;
    validation::validate_non_empty_string("template", template)?;
    validation::validate_non_empty_string("relay.host", &relay.host)?;
    validation::validate_range("relay.port", relay.port, 1, u16::MAX)?;

    if !template.contains(NAME_PLACEHOLDER) {
        tracing::warn!(
            "⚠️ Template has no {} placeholder; every student gets the same text",
            NAME_PLACEHOLDER
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = NotifySettings::new("office@example.com");
        assert!(settings.validate().is_ok());
        assert_eq!(settings.relay, RelayConfig::default());
        assert_eq!(settings.subject(), DEFAULT_SUBJECT);
    }

    #[test]
    fn test_sender_must_be_an_address() {
        let settings = NotifySettings::new("office");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let mut settings = NotifySettings::new("office@example.com");
        settings.relay.port = 0;
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_defaults() {
        let cli = CliConfig::parse_from(["roster-notify", "--sender", "office@example.com"]);
        let settings = cli.to_settings().unwrap();

        assert_eq!(settings.sender_address, "office@example.com");
        assert_eq!(settings.template, DEFAULT_TEMPLATE);
        assert_eq!(settings.relay.host, "smtp.gmail.com");
        assert_eq!(settings.relay.port, 587);
        assert!(cli.credential.is_none());
        assert!(!cli.dry_run);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_template_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Hello {{student_name}}").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "roster-notify",
            "--sender",
            "office@example.com",
            "--template-file",
            path.as_str(),
        ]);

        assert_eq!(cli.to_settings().unwrap().template, "Hello {student_name}");
    }
}
