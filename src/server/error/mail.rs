use thiserror::Error;

/// Failures while rendering or delivering email.
#[derive(Error, Debug)]
pub enum MailError {
    /// The request to the provider failed before a response was received.
    #[error("Email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with an error status.
    #[error("Email provider rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,
        /// Error message from the provider's response body
        message: String,
    },

    /// A batch exceeded the provider's message limit.
    #[error("Email batch of {0} messages exceeds the provider limit")]
    BatchTooLarge(usize),

    /// An email template failed to render.
    #[error("Failed to render email template: {0}")]
    Render(#[from] askama::Error),
}

impl MailError {
    /// Whether sending the same request again may succeed.
    ///
    /// Transport failures, throttling (429) and provider errors (5xx) are transient.
    /// Other rejections and local errors fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::BatchTooLarge(_) | Self::Render(_) => false,
        }
    }
}
