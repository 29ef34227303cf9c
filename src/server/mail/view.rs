//! Email views.
//!
//! Each view is an askama template under `templates/email/` sharing one base layout,
//! parameterised by the recipient and the relevant date. `EmailView` pairs the body
//! with its subject line.

use askama::Template;
use chrono::NaiveDate;

use super::EmailMessage;
use crate::server::{error::mail::MailError, model::member::Member};

/// Club contact details shown in every email.
pub struct ClubInfo {
    pub name: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub address: &'static str,
}

pub const CLUB: ClubInfo = ClubInfo {
    name: "GARD 018",
    phone: "+381 62 202 420",
    email: "info@gard018.com",
    address: "Niš, Srbija",
};

/// Formats a date the way Serbian readers expect, e.g. `10.1.2025.`
pub fn format_date_sr(date: NaiveDate) -> String {
    date.format("%-d.%-m.%Y.").to_string()
}

pub trait EmailView: Template {
    fn subject(&self) -> String;

    /// Renders the view into a message for `to`.
    fn to_message(&self, to: &str) -> Result<EmailMessage, MailError> {
        Ok(EmailMessage {
            to: to.to_string(),
            subject: self.subject(),
            html: self.render()?,
        })
    }
}

/// Reminder sent a few days before a membership expires.
#[derive(Template)]
#[template(path = "email/expiry_warning.html")]
pub struct ExpiryWarningEmail<'a> {
    pub club: &'a ClubInfo,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub expiry_date: String,
    pub days_left: u32,
}

impl<'a> ExpiryWarningEmail<'a> {
    pub fn for_member(member: &'a Member, days_left: u32) -> Self {
        Self {
            club: &CLUB,
            first_name: &member.first_name,
            last_name: &member.last_name,
            expiry_date: format_date_sr(member.expiry_date),
            days_left,
        }
    }
}

impl EmailView for ExpiryWarningEmail<'_> {
    fn subject(&self) -> String {
        format!(
            "Obaveštenje - Članarina ističe za {} dana - {}",
            self.days_left, self.club.name
        )
    }
}

/// Sent to the member on the day the membership expires.
#[derive(Template)]
#[template(path = "email/membership_expired.html")]
pub struct MembershipExpiredEmail<'a> {
    pub club: &'a ClubInfo,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub expiry_date: String,
}

impl<'a> MembershipExpiredEmail<'a> {
    pub fn for_member(member: &'a Member) -> Self {
        Self {
            club: &CLUB,
            first_name: &member.first_name,
            last_name: &member.last_name,
            expiry_date: format_date_sr(member.expiry_date),
        }
    }
}

impl EmailView for MembershipExpiredEmail<'_> {
    fn subject(&self) -> String {
        format!("Obaveštenje - Istekla članarina - {}", self.club.name)
    }
}

/// Internal notice to the club founder that a member's membership expired.
#[derive(Template)]
#[template(path = "email/founder_notice.html")]
pub struct FounderExpiryNotice<'a> {
    pub club: &'a ClubInfo,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub expiry_date: String,
}

impl<'a> FounderExpiryNotice<'a> {
    pub fn for_member(member: &'a Member) -> Self {
        Self {
            club: &CLUB,
            first_name: &member.first_name,
            last_name: &member.last_name,
            email: &member.email,
            expiry_date: format_date_sr(member.expiry_date),
        }
    }
}

impl EmailView for FounderExpiryNotice<'_> {
    fn subject(&self) -> String {
        format!("Članarina istekla - {} {}", self.first_name, self.last_name)
    }
}

/// Password reset link.
#[derive(Template)]
#[template(path = "email/password_reset.html")]
pub struct PasswordResetEmail<'a> {
    pub club: &'a ClubInfo,
    pub first_name: &'a str,
    pub reset_url: &'a str,
    pub valid_minutes: i64,
}

impl EmailView for PasswordResetEmail<'_> {
    fn subject(&self) -> String {
        format!("Resetovanje lozinke - {}", self.club.name)
    }
}
