use crate::core::{Credential, MailTransport, OutgoingEmail};
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RELAY_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_RELAY_PORT: u16 = 587;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_RELAY_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_RELAY_PORT
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// STARTTLS relay。每封信建立一條新連線，送完即關閉。
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    relay: RelayConfig,
}

impl SmtpRelay {
    pub fn new(relay: RelayConfig) -> Self {
        Self { relay }
    }

    pub fn relay(&self) -> &RelayConfig {
        &self.relay
    }

    fn build_message(email: &OutgoingEmail) -> Result<Message> {
        let message = Message::builder()
            .from(email.from.trim().parse()?)
            .to(email.to.trim().parse()?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;
        Ok(message)
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn deliver(&self, email: &OutgoingEmail, credential: &Credential) -> Result<()> {
        let message = Self::build_message(email)?;

        // EHLO -> STARTTLS -> EHLO -> AUTH，由 lettre 完成
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.relay.host)?
            .port(self.relay.port)
            .credentials(Credentials::new(email.from.trim().to_string(), credential.normalized()))
            .build();

        tracing::debug!(
            "Connecting to {}:{} for {}",
            self.relay.host,
            self.relay.port,
            email.to
        );
        transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::NotifyError;

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: "office@example.com".to_string(),
            to: to.to_string(),
            subject: "Reminder".to_string(),
            body: "Dear Alice,".to_string(),
        }
    }

    #[test]
    fn test_default_relay_is_gmail_submission_port() {
        let relay = RelayConfig::default();
        assert_eq!(relay.host, "smtp.gmail.com");
        assert_eq!(relay.port, 587);
    }

    #[test]
    fn test_build_message_is_plain_text() {
        let message = SmtpRelay::build_message(&email("alice@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: alice@example.com"));
        assert!(raw.contains("Subject: Reminder"));
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[test]
    fn test_unparseable_recipient_fails_before_connecting() {
        let relay = SmtpRelay::new(RelayConfig::default());
        let credential = Credential::new("abcdefghijklmnop");

        let result = tokio_test::block_on(relay.deliver(&email("not an address"), &credential));

        assert!(matches!(result, Err(NotifyError::Address(_))));
    }
}
