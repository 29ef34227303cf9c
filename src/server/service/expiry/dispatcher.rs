//! Sequential batch delivery with retry and pacing.

use std::time::Duration;

use super::{batch, batch::Notification, retry::RetryPolicy};
use crate::server::{
    error::mail::MailError,
    mail::{DeliveryReceipt, Mailer},
};

/// Sends batches one after another through a `Mailer`.
///
/// Each batch goes through the retry policy with one idempotency key for all of its
/// attempts; only transient provider errors are retried. Consecutive batches are
/// separated by `pause` to stay under the provider's request rate.
pub struct BatchDispatcher<'a> {
    mailer: &'a dyn Mailer,
    retry: RetryPolicy,
    pause: Duration,
    sent_batches: usize,
}

impl<'a> BatchDispatcher<'a> {
    pub fn new(mailer: &'a dyn Mailer, retry: RetryPolicy, pause: Duration) -> Self {
        Self {
            mailer,
            retry,
            pause,
            sent_batches: 0,
        }
    }

    /// Sends one batch, pausing first unless it is the first batch of the run.
    ///
    /// # Returns
    /// - `Ok(DeliveryReceipt)` - Provider confirmed the whole batch
    /// - `Err(MailError)` - A permanent error, or the final error after all retry attempts
    pub async fn dispatch(
        &mut self,
        batch: &[Notification],
    ) -> Result<DeliveryReceipt, MailError> {
        if self.sent_batches > 0 && !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
        self.sent_batches += 1;

        let messages = batch::messages(batch);
        let key = batch::idempotency_key(batch);
        let label = format!("Email batch {} ({} messages)", self.sent_batches, messages.len());

        self.retry
            .run(&label, MailError::is_retryable, || {
                self.mailer.send_batch(messages.clone(), &key)
            })
            .await
    }
}
