use crate::core::credential::validate_credential;
use crate::core::{Credential, MailTransport, OutgoingEmail, SendOutcome};
use crate::utils::error::NotifyError;

pub const NAME_PLACEHOLDER: &str = "{student_name}";

pub const DEFAULT_SUBJECT: &str = "Important: Complete Your Classes - Action Required";

pub const DEFAULT_TEMPLATE: &str = "Dear {student_name},

We noticed that you haven't completed your classes yet (0% completion).

Please log in to your account and complete the remaining classes as soon as possible. Your progress is important for your academic success.

If you have any questions or need assistance, please don't hesitate to contact us.

Best regards,
Innovative Skills LTD";

/// 把顯示名稱代入 `{student_name}`
pub fn render_template(template: &str, display_name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, display_name)
}

#[derive(Debug, Clone)]
pub struct NotificationRequest<'a> {
    pub sender: &'a str,
    pub credential: &'a Credential,
    pub recipient: &'a str,
    pub display_name: &'a str,
    pub subject: &'a str,
    pub template: &'a str,
}

/// 每次呼叫只嘗試寄出一封信，不重試，也不共用 relay 連線
pub struct Notifier<T: MailTransport> {
    transport: T,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn notify(&self, request: &NotificationRequest<'_>) -> SendOutcome {
        let verdict = validate_credential(Some(request.credential.expose()));
        if !verdict.is_valid() {
            tracing::debug!("Skipping {}: credential rejected before connecting", request.recipient);
            let error = NotifyError::CredentialFormat {
                reason: verdict.reason(),
            };
            return SendOutcome::Failure(error.to_string());
        }

        let email = OutgoingEmail {
            from: request.sender.to_string(),
            to: request.recipient.to_string(),
            subject: request.subject.to_string(),
            body: render_template(request.template, request.display_name),
        };

        match self.transport.deliver(&email, request.credential).await {
            Ok(()) => {
                tracing::debug!("Delivered reminder to {}", request.recipient);
                SendOutcome::Success
            }
            Err(e) => {
                tracing::warn!("Delivery to {} failed: {}", request.recipient, e);
                SendOutcome::Failure(e.to_string())
            }
        }
    }
}
