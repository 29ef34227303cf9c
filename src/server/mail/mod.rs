//! Transactional email delivery.
//!
//! The `Mailer` trait is the boundary to the email provider: a single send and a
//! batch send of at most `MAX_BATCH_SIZE` messages. `ResendMailer` is the
//! production implementation; views in `view` render the message bodies.

pub mod resend;
pub mod view;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde::Serialize;

use crate::server::error::mail::MailError;

/// Most messages the provider accepts in one batch request.
pub const MAX_BATCH_SIZE: usize = 100;

/// A rendered email addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Provider message ids returned for an accepted send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReceipt {
    pub ids: Vec<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message.
    async fn send(&self, message: EmailMessage) -> Result<DeliveryReceipt, MailError>;

    /// Sends up to `MAX_BATCH_SIZE` messages in one provider request.
    ///
    /// The batch is accepted or rejected as a whole. Requests repeating an
    /// `idempotency_key` are delivered at most once by the provider.
    async fn send_batch(
        &self,
        messages: Vec<EmailMessage>,
        idempotency_key: &str,
    ) -> Result<DeliveryReceipt, MailError>;
}
