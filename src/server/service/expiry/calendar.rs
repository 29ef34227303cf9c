//! Club-local calendar for the expiry job.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[cfg(test)]
#[derive(Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The two civil dates one run of the expiry job works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryCalendar {
    /// Members expiring on this date receive the expiry email and become expired.
    pub today: NaiveDate,
    /// Members expiring on this date receive the advance warning.
    pub warning_date: NaiveDate,
}

impl ExpiryCalendar {
    /// Derives today's date in `timezone` and the warning date `warning_days` later.
    ///
    /// The offset is applied to the civil date, so a DST transition between the two
    /// dates never shifts the warning date.
    pub fn at(now: DateTime<Utc>, timezone: Tz, warning_days: u32) -> Self {
        let today = now.with_timezone(&timezone).date_naive();
        let warning_date = today
            .checked_add_days(Days::new(u64::from(warning_days)))
            .unwrap_or(NaiveDate::MAX);

        Self {
            today,
            warning_date,
        }
    }
}

/// Formats a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
