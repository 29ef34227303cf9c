//! Background jobs run on cron schedules.

pub mod membership_expiry;
