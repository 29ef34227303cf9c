use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A member that was notified by the expiry job.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntryDto {
    pub member_id: i32,
    pub name: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub expiry_date: String,
}

/// A member whose notification could not be confirmed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailedNotificationDto {
    pub member_id: i32,
    pub name: String,
    pub email: String,
    /// `warning` or `expiry`
    pub kind: String,
    pub reason: String,
}

/// Result of one run of the membership expiry job.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryReportDto {
    pub success: bool,
    pub message: String,
    /// Club-local date the run treated as today, `YYYY-MM-DD`.
    pub today: String,
    /// Expiry date that triggers the advance warning, `YYYY-MM-DD`.
    pub warning_date: String,
    pub warning_sent: usize,
    pub expiry_sent: usize,
    /// Members skipped because they were already notified for this expiry date.
    pub skipped: usize,
    pub warning_notifications: Vec<NotificationEntryDto>,
    pub expiry_notifications: Vec<NotificationEntryDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<FailedNotificationDto>>,
    pub timestamp: DateTime<Utc>,
}

/// Response of the manual trigger endpoint.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualTriggerDto {
    pub test_triggered: bool,
    pub timestamp: DateTime<Utc>,
    pub result: ExpiryReportDto,
}

/// Body returned when the expiry job could not run to completion.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ExpiryFailureDto {
    pub success: bool,
    pub error: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TestEmailDto {
    pub email: String,
}
