//! Membership notification kinds recorded in the notification ledger.

/// Which expiry email a member received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Sent a few days before the expiry date.
    Warning,
    /// Sent on the expiry date, together with the founder notice.
    Expiry,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Expiry => "expiry",
        }
    }
}
