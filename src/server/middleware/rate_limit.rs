//! Fixed-window rate limiting for public endpoints.
//!
//! Counters live behind the `RateLimitStore` trait. The in-memory store is the
//! default; a shared backend can be swapped in through `AppState` when the portal
//! runs on more than one instance.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

use crate::server::error::AppError;

/// Request budget for one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub scope: &'static str,
    pub max_requests: u32,
    pub window_secs: i64,
}

pub const LOGIN: RateLimitPolicy = RateLimitPolicy {
    scope: "login",
    max_requests: 5,
    window_secs: 60,
};

pub const REGISTER: RateLimitPolicy = RateLimitPolicy {
    scope: "register",
    max_requests: 3,
    window_secs: 60 * 60,
};

pub const FORGOT_PASSWORD: RateLimitPolicy = RateLimitPolicy {
    scope: "forgot-password",
    max_requests: 3,
    window_secs: 15 * 60,
};

pub const CONTACT: RateLimitPolicy = RateLimitPolicy {
    scope: "contact",
    max_requests: 5,
    window_secs: 60 * 60,
};

/// Requests counted in the current window of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

/// Outcome of counting one request against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHit {
    /// The window after this request.
    pub window: RateLimitWindow,
    /// Whether the request fit in the window and was counted.
    pub counted: bool,
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Counts one request against `key` as a single atomic step.
    ///
    /// Opens a fresh window of `window` length when none is open at `now`. The count
    /// is only incremented while it is below `max_requests`.
    async fn hit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitHit;

    /// Drops windows that closed before `now`; returns how many were removed.
    async fn sweep(&self, now: DateTime<Utc>) -> usize;
}

#[derive(Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, RateLimitWindow>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitHit {
        let mut windows = self.windows.lock().await;

        let entry = windows
            .entry(key.to_string())
            .or_insert(RateLimitWindow {
                count: 0,
                reset_at: now + window,
            });
        if entry.reset_at <= now {
            *entry = RateLimitWindow {
                count: 0,
                reset_at: now + window,
            };
        }

        let counted = entry.count < max_requests;
        if counted {
            entry.count += 1;
        }

        RateLimitHit {
            window: *entry,
            counted,
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, window| window.reset_at > now);
        before - windows.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed {
        remaining: u32,
    },
    Limited {
        retry_after_secs: u64,
        reset_at: DateTime<Utc>,
    },
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::new()))
    }

    /// Counts a request from `client` against `policy`.
    ///
    /// A window opens on the first request and closes `window_secs` later. Limited
    /// requests are not counted.
    pub async fn check(
        &self,
        policy: RateLimitPolicy,
        client: &str,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let key = format!("{}:{}", policy.scope, client);
        let hit = self
            .store
            .hit(
                &key,
                policy.max_requests,
                Duration::seconds(policy.window_secs),
                now,
            )
            .await;

        if !hit.counted {
            let retry_after_secs = (hit.window.reset_at - now).num_seconds().max(1) as u64;
            return RateLimitDecision::Limited {
                retry_after_secs,
                reset_at: hit.window.reset_at,
            };
        }

        RateLimitDecision::Allowed {
            remaining: policy.max_requests.saturating_sub(hit.window.count),
        }
    }

    /// Like `check`, but turns a limited request into `AppError::TooManyRequests`.
    pub async fn enforce(
        &self,
        policy: RateLimitPolicy,
        client: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match self.check(policy, client, now).await {
            RateLimitDecision::Allowed { .. } => Ok(()),
            RateLimitDecision::Limited {
                retry_after_secs,
                reset_at,
            } => {
                tracing::warn!("Rate limit hit for {} from {}", policy.scope, client);
                Err(AppError::TooManyRequests {
                    retry_after_secs,
                    reset_at,
                })
            }
        }
    }

    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.store.sweep(now).await
    }
}
