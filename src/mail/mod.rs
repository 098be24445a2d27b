//! # Email Integration
//!
//! Email notifications for resource lifecycle events: a welcome message on
//! signup and an account-deletion notice. Mail failures are logged and
//! never fail the request that triggered them.

pub mod errors;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub use errors::{MailError, MailResult};

/// Email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Whether outbound mail is enabled (mock sender otherwise)
    pub enabled: bool,

    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username
    pub smtp_user: String,

    /// SMTP password (should come from secrets)
    pub smtp_password: String,

    /// From email address
    pub from_email: String,

    /// From name
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@restbase.local".to_string(),
            from_name: "restbase".to_string(),
        }
    }
}

/// Email template types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Sent when an account is created
    Welcome { name: String },

    /// Sent when an account is soft-deleted
    AccountDeleted { name: String },
}

impl EmailTemplate {
    pub fn subject(&self) -> String {
        match self {
            EmailTemplate::Welcome { .. } => "Welcome!".to_string(),
            EmailTemplate::AccountDeleted { .. } => "Your account has been deleted".to_string(),
        }
    }

    pub fn body(&self) -> String {
        match self {
            EmailTemplate::Welcome { name } => format!(
                "Hi {},\n\nYour account is ready. You can now sign in and start using the API.\n",
                name
            ),
            EmailTemplate::AccountDeleted { name } => format!(
                "Hi {},\n\nYour account and its upcoming activity have been deactivated. \
                 If this wasn't you, please contact support.\n",
                name
            ),
        }
    }
}

/// Email sending abstraction
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, template: &EmailTemplate) -> MailResult<()>;
}

/// Mock email sender that records messages (for tests)
#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: std::sync::Mutex<Vec<(String, EmailTemplate)>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, as (recipient, template) pairs
    pub fn sent(&self) -> Vec<(String, EmailTemplate)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, to: &str, template: &EmailTemplate) -> MailResult<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((to.to_string(), template.clone()));
        }
        Ok(())
    }
}

/// Sender used when outbound mail is switched off; logs and drops
#[derive(Debug, Default)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, to: &str, template: &EmailTemplate) -> MailResult<()> {
        tracing::info!(to, subject = %template.subject(), "email disabled, dropping message");
        Ok(())
    }
}

/// SMTP email sender backed by lettre
pub struct SmtpEmailSender {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> MailResult<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?.port(config.smtp_port);

        if !config.smtp_user.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    fn from_mailbox(&self) -> MailResult<Mailbox> {
        Ok(format!("{} <{}>", self.config.from_name, self.config.from_email).parse()?)
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, template: &EmailTemplate) -> MailResult<()> {
        let message = Message::builder()
            .from(self.from_mailbox()?)
            .to(to.parse()?)
            .subject(template.subject())
            .body(template.body())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_mention_name() {
        let welcome = EmailTemplate::Welcome {
            name: "Ada".to_string(),
        };
        assert!(welcome.body().contains("Ada"));
        assert!(!welcome.subject().is_empty());

        let deleted = EmailTemplate::AccountDeleted {
            name: "Ada".to_string(),
        };
        assert!(deleted.body().contains("Ada"));
        assert!(deleted.subject().contains("deleted"));
    }

    #[tokio::test]
    async fn test_mock_sender_records_messages() {
        let sender = MockEmailSender::new();
        let template = EmailTemplate::Welcome {
            name: "Ada".to_string(),
        };

        sender.send("ada@example.com", &template).await.unwrap();

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "ada@example.com");
        assert_eq!(sent[0].1, template);
    }
}
