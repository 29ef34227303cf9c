//! Resend HTTP API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DeliveryReceipt, EmailMessage, Mailer, MAX_BATCH_SIZE};
use crate::server::error::mail::MailError;

/// Delivers email through the Resend REST API.
pub struct ResendMailer {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    reply_to: String,
}

#[derive(Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    reply_to: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Deserialize)]
struct BatchResponse {
    data: Vec<SendResponse>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

impl ResendMailer {
    pub fn new(
        http_client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        reply_to: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from: from.into(),
            reply_to: reply_to.into(),
        }
    }

    fn payload<'a>(&'a self, message: &'a EmailMessage) -> ResendEmail<'a> {
        ResendEmail {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            reply_to: &self.reply_to,
        }
    }

    /// Posts `body` to `path` and returns the successful response.
    ///
    /// An `idempotency_key` is sent as the `Idempotency-Key` header.
    ///
    /// # Returns
    /// - `Ok(Response)` - Provider answered with a 2xx status
    /// - `Err(MailError::Rejected)` - Provider answered with an error status
    /// - `Err(MailError::Transport)` - Request could not be completed
    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        idempotency_key: Option<&str>,
    ) -> Result<reqwest::Response, MailError> {
        let mut request = self
            .http_client
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        Err(MailError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<DeliveryReceipt, MailError> {
        let response = self.post("/emails", &self.payload(&message), None).await?;
        let body: SendResponse = response.json().await?;

        Ok(DeliveryReceipt { ids: vec![body.id] })
    }

    async fn send_batch(
        &self,
        messages: Vec<EmailMessage>,
        idempotency_key: &str,
    ) -> Result<DeliveryReceipt, MailError> {
        if messages.len() > MAX_BATCH_SIZE {
            return Err(MailError::BatchTooLarge(messages.len()));
        }
        if messages.is_empty() {
            return Ok(DeliveryReceipt::default());
        }

        let payload: Vec<ResendEmail> = messages.iter().map(|m| self.payload(m)).collect();
        let response = self
            .post("/emails/batch", &payload, Some(idempotency_key))
            .await?;
        let body: BatchResponse = response.json().await?;

        Ok(DeliveryReceipt {
            ids: body.data.into_iter().map(|entry| entry.id).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::service::expiry::retry::RetryPolicy;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::{sync::Arc, time::Duration};
    use tokio::sync::Mutex;

    /// How the stand-in provider answers batch requests.
    #[derive(Clone, Copy, PartialEq)]
    enum Provider {
        Accepting,
        Rejecting,
        /// Answers the first batch request with a 500, then accepts.
        FailingOnce,
    }

    struct CapturedRequest {
        path: String,
        auth: Option<String>,
        idempotency_key: Option<String>,
        body: Value,
    }

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<CapturedRequest>>>,
    }

    /// Records a request and returns how many requests were seen so far.
    async fn capture(captured: &Captured, path: &str, headers: &HeaderMap, body: Value) -> usize {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let mut requests = captured.requests.lock().await;
        requests.push(CapturedRequest {
            path: path.to_string(),
            auth: header("authorization"),
            idempotency_key: header("idempotency-key"),
            body,
        });
        requests.len()
    }

    /// Starts a local stand-in for the provider and returns its base url.
    async fn spawn_provider(provider: Provider) -> (String, Captured) {
        let captured = Captured::default();

        let app = Router::new()
            .route(
                "/emails",
                post(
                    |State(c): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        capture(&c, "/emails", &headers, body).await;
                        (StatusCode::OK, Json(json!({ "id": "msg-1" })))
                    },
                ),
            )
            .route(
                "/emails/batch",
                post(
                    move |State(c): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| async move {
                        let seen = capture(&c, "/emails/batch", &headers, body.clone()).await;
                        if provider == Provider::Rejecting {
                            return (
                                StatusCode::UNPROCESSABLE_ENTITY,
                                Json(json!({ "statusCode": 422, "message": "Invalid `to` field" })),
                            );
                        }
                        if provider == Provider::FailingOnce && seen == 1 {
                            return (
                                StatusCode::INTERNAL_SERVER_ERROR,
                                Json(json!({ "statusCode": 500, "message": "Internal error" })),
                            );
                        }
                        let count = body.as_array().map(|a| a.len()).unwrap_or(0);
                        let data: Vec<Value> =
                            (0..count).map(|i| json!({ "id": format!("msg-{}", i) })).collect();
                        (StatusCode::OK, Json(json!({ "data": data })))
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn mailer(api_url: &str) -> ResendMailer {
        ResendMailer::new(
            reqwest::Client::new(),
            api_url,
            "re_test",
            "GARD 018 <info@gard018.com>",
            "info@gard018.com",
        )
    }

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Subject".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    /// Tests a single send posts the sender, reply-to and bearer key.
    ///
    /// Expected: one request to /emails with the configured headers and fields
    #[tokio::test]
    async fn sends_single_email_with_sender_and_key() {
        let (url, captured) = spawn_provider(Provider::Accepting).await;

        let receipt = mailer(&url).send(message("ana@example.com")).await.unwrap();

        assert_eq!(receipt.ids, vec!["msg-1".to_string()]);
        let requests = captured.requests.lock().await;
        let request = &requests[0];
        assert_eq!(request.path, "/emails");
        assert_eq!(request.auth.as_deref(), Some("Bearer re_test"));
        assert_eq!(request.idempotency_key, None);
        assert_eq!(request.body["from"], "GARD 018 <info@gard018.com>");
        assert_eq!(request.body["reply_to"], "info@gard018.com");
        assert_eq!(request.body["to"], json!(["ana@example.com"]));
    }

    /// Tests a batch send posts every message in one request.
    ///
    /// Expected: one request to /emails/batch carrying both messages and the key
    #[tokio::test]
    async fn sends_batch_in_one_request() {
        let (url, captured) = spawn_provider(Provider::Accepting).await;

        let receipt = mailer(&url)
            .send_batch(
                vec![message("a@example.com"), message("b@example.com")],
                "membership-expiry/abc",
            )
            .await
            .unwrap();

        assert_eq!(receipt.ids.len(), 2);
        let requests = captured.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/emails/batch");
        assert_eq!(requests[0].body.as_array().unwrap().len(), 2);
        assert_eq!(
            requests[0].idempotency_key.as_deref(),
            Some("membership-expiry/abc")
        );
    }

    /// Tests a batch retried after a provider error repeats its idempotency key.
    ///
    /// Expected: two requests carrying the same Idempotency-Key header, then Ok
    #[tokio::test]
    async fn retried_batch_repeats_idempotency_key() {
        let (url, captured) = spawn_provider(Provider::FailingOnce).await;
        let mailer = mailer(&url);
        let retry = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        };
        let messages = vec![message("a@example.com")];

        let receipt = retry
            .run("batch", MailError::is_retryable, || {
                mailer.send_batch(messages.clone(), "membership-expiry/abc")
            })
            .await
            .unwrap();

        assert_eq!(receipt.ids.len(), 1);
        let requests = captured.requests.lock().await;
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .all(|r| r.idempotency_key.as_deref() == Some("membership-expiry/abc")));
    }

    /// Tests the provider's error message is surfaced.
    ///
    /// Expected: Err(Rejected) with status 422 and the body's message
    #[tokio::test]
    async fn surfaces_provider_rejection() {
        let (url, _) = spawn_provider(Provider::Rejecting).await;

        let result = mailer(&url)
            .send_batch(vec![message("a@example.com")], "key")
            .await;

        assert!(matches!(
            result,
            Err(MailError::Rejected { status: 422, ref message }) if message == "Invalid `to` field"
        ));
    }

    /// Tests oversized batches are refused before any request is made.
    ///
    /// Expected: Err(BatchTooLarge) and no request recorded
    #[tokio::test]
    async fn refuses_oversized_batch() {
        let (url, captured) = spawn_provider(Provider::Accepting).await;
        let messages = (0..=MAX_BATCH_SIZE)
            .map(|i| message(&format!("m{}@example.com", i)))
            .collect();

        let result = mailer(&url).send_batch(messages, "key").await;

        assert!(matches!(result, Err(MailError::BatchTooLarge(101))));
        assert!(captured.requests.lock().await.is_empty());
    }
}
