//! Mail transport for staffmail.
//!
//! Delivery is delegated to an external mail queue service reached over
//! HTTP. The service decides how and when SMTP happens; this side only
//! learns whether the mail was accepted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::config::TransportConfig;
use crate::db::User;
use crate::{Result, StaffmailError};

use super::types::{Mail, MailAttachment};

/// User agent sent to the queue service.
const USER_AGENT: &str = "staffmail/0.1";

/// Result of a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The transport accepted the mail.
    Delivered,
    /// The transport was reached and refused the mail.
    Rejected,
    /// No delivery was attempted (disabled, unreachable, timed out).
    NotAttempted,
}

impl DeliveryOutcome {
    /// Whether the mail may be considered sent.
    pub fn is_delivered(self) -> bool {
        self == DeliveryOutcome::Delivered
    }
}

/// Party of an outgoing mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub name: String,
    pub email: String,
}

impl From<&User> for Mailbox {
    fn from(user: &User) -> Self {
        Self {
            name: user.staff_name.clone(),
            email: user.staff_email.clone(),
        }
    }
}

/// Attachment reference of an outgoing mail. The queue reads the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingAttachment {
    pub filename: String,
    pub path: String,
}

/// A mail ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub mail_id: Uuid,
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub message: String,
    pub attachments: Vec<OutgoingAttachment>,
}

impl OutgoingMail {
    /// Assemble the outgoing form of a stored mail.
    pub fn build(mail: &Mail, sender: &User, receiver: &User, attachments: &[MailAttachment]) -> Self {
        Self {
            mail_id: mail.id,
            from: Mailbox::from(sender),
            to: Mailbox::from(receiver),
            subject: mail.subject.clone(),
            message: mail.message.clone(),
            attachments: attachments
                .iter()
                .map(|a| OutgoingAttachment {
                    filename: a.filename.clone(),
                    path: a.saved_path.clone(),
                })
                .collect(),
        }
    }
}

/// Something that can attempt delivery of a mail.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt delivery. Failures are reported through the outcome.
    async fn deliver(&self, mail: &OutgoingMail) -> DeliveryOutcome;
}

/// Transport posting mail to the queue service as JSON.
pub struct QueueTransport {
    client: Client,
    endpoint: Option<Url>,
    username: String,
    password: String,
}

impl QueueTransport {
    /// Create a transport from configuration.
    ///
    /// A disabled transport never contacts the network and reports
    /// [`DeliveryOutcome::NotAttempted`].
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let endpoint = if config.enabled {
            let url = Url::parse(&config.queue_url).map_err(|e| {
                StaffmailError::Config(format!("invalid queue url '{}': {e}", config.queue_url))
            })?;
            Some(url)
        } else {
            None
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StaffmailError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Whether the transport will attempt deliveries.
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl MailTransport for QueueTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> DeliveryOutcome {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(mail_id = %mail.mail_id, "Transport disabled, not delivering");
            return DeliveryOutcome::NotAttempted;
        };

        let mut request = self.client.post(endpoint.clone()).json(mail);
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(mail_id = %mail.mail_id, "Mail accepted by queue");
                DeliveryOutcome::Delivered
            }
            Ok(response) => {
                let status = response.status();
                tracing::warn!(
                    mail_id = %mail.mail_id,
                    status = status.as_u16(),
                    "Mail rejected by queue"
                );
                if status == StatusCode::SERVICE_UNAVAILABLE {
                    DeliveryOutcome::NotAttempted
                } else {
                    DeliveryOutcome::Rejected
                }
            }
            Err(e) => {
                tracing::warn!(mail_id = %mail.mail_id, error = %e, "Mail queue unreachable");
                DeliveryOutcome::NotAttempted
            }
        }
    }
}
