//! Recording `Mailer` used by tests.

use async_trait::async_trait;
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::Mutex;

use super::{DeliveryReceipt, EmailMessage, Mailer};
use crate::server::error::mail::MailError;

/// Records every request and answers with scripted results.
///
/// Each call pops the next scripted response; `Ok(())` is used once the script is
/// exhausted. An `Err(message)` becomes a transient `MailError::Rejected` with
/// status 503; `with_errors` scripts any other error.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    responses: Arc<Mutex<VecDeque<Result<(), MailError>>>>,
    batches: Arc<Mutex<Vec<Vec<EmailMessage>>>>,
    batch_keys: Arc<Mutex<Vec<String>>>,
    singles: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Result<(), String>>) -> Self {
        Self::with_errors(
            responses
                .into_iter()
                .map(|response| {
                    response.map_err(|message| MailError::Rejected {
                        status: 503,
                        message,
                    })
                })
                .collect(),
        )
    }

    pub fn with_errors(responses: Vec<Result<(), MailError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Default::default()
        }
    }

    /// Every batch request made, including failed attempts.
    pub async fn batches(&self) -> Vec<Vec<EmailMessage>> {
        self.batches.lock().await.clone()
    }

    /// Idempotency key of every batch request, in call order.
    pub async fn batch_keys(&self) -> Vec<String> {
        self.batch_keys.lock().await.clone()
    }

    pub async fn singles(&self) -> Vec<EmailMessage> {
        self.singles.lock().await.clone()
    }

    async fn next_response(&self, count: usize) -> Result<DeliveryReceipt, MailError> {
        let response = self.responses.lock().await.pop_front().unwrap_or(Ok(()));

        response.map(|()| DeliveryReceipt {
            ids: (0..count).map(|i| format!("email-{}", i)).collect(),
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<DeliveryReceipt, MailError> {
        self.singles.lock().await.push(message);
        self.next_response(1).await
    }

    async fn send_batch(
        &self,
        messages: Vec<EmailMessage>,
        idempotency_key: &str,
    ) -> Result<DeliveryReceipt, MailError> {
        let count = messages.len();
        self.batches.lock().await.push(messages);
        self.batch_keys.lock().await.push(idempotency_key.to_string());
        self.next_response(count).await
    }
}
