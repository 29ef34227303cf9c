//! Request guards: session auth, cron secret and rate limiting.

pub mod auth;
pub mod cron;
pub mod rate_limit;
pub mod session;

#[cfg(test)]
mod test;
