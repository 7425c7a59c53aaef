//! Alert email delivery over SMTP.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{MailConfig, MailTls};
use crate::error::{ConfigError, ContactError};

pub const DEFAULT_SENDER: &str = "noreply@contactmanager.com";
pub const DEFAULT_RECIPIENT: &str = "Admin@contactmanager.com";
pub const ALERT_SUBJECT: &str = "ContactManager System Alert";

/// Plain-text alert sent to the administrator after a contact is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAlert {
    pub contact_id: Uuid,
    pub subject: String,
    pub body: String,
}

impl ContactAlert {
    pub fn contact_updated(contact_id: Uuid) -> Self {
        Self {
            contact_id,
            subject: ALERT_SUBJECT.to_string(),
            body: format!("Contact with id:{} was updated", contact_id),
        }
    }
}

/// Sends alert messages. Implementations report failures; callers decide
/// whether they matter.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_alert(&self, alert: &ContactAlert) -> Result<(), ContactError>;
}

/// SMTP delivery to a fixed recipient.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, ConfigError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| ConfigError::invalid("MAIL_FROM", e.to_string()))?;
        let to = config
            .to
            .parse::<Mailbox>()
            .map_err(|e| ConfigError::invalid("MAIL_TO", e.to_string()))?;

        // No authentication: the relay is expected to accept local submissions
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_host.as_str())
                .port(config.smtp_port)
                .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if config.tls == MailTls::Opportunistic {
            if config.accept_invalid_certs {
                warn!(
                    host = %config.smtp_host,
                    "SMTP certificate validation is disabled; do not use outside local testing"
                );
            }
            let params = TlsParameters::builder(config.smtp_host.clone())
                .dangerous_accept_invalid_certs(config.accept_invalid_certs)
                .build()
                .map_err(|e| ConfigError::invalid("SMTP_TLS", e.to_string()))?;
            builder = builder.tls(Tls::Opportunistic(params));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    fn build_message(&self, alert: &ContactAlert) -> Result<Message, ContactError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(alert.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| ContactError::transport(format!("could not build alert message: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_alert(&self, alert: &ContactAlert) -> Result<(), ContactError> {
        let message = self.build_message(alert)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ContactError::transport(format!("SMTP send failed: {}", e)))?;
        info!(contact_id = %alert.contact_id, "Sent contact alert email");
        Ok(())
    }
}

/// Used when mail is switched off: the alert is logged instead of sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_alert(&self, alert: &ContactAlert) -> Result<(), ContactError> {
        info!(contact_id = %alert.contact_id, body = %alert.body, "Mail disabled; alert not sent");
        Ok(())
    }
}
