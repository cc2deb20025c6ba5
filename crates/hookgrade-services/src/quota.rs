//! Fixed-window request quota keyed by client identifier.
//!
//! The [`QuotaGate`] admits or denies a request before any backend is
//! called. Counting lives behind the [`QuotaStore`] trait so the in-process
//! [`InMemoryQuotaStore`] can be replaced by a shared store when several
//! instances serve the same clients.
//!
//! # Algorithm
//!
//! Each client has one [`QuotaRecord`] `{ count, window_start }`. On every
//! admission attempt:
//!
//! 1. If the client is unseen, or `now - window_start` exceeds the window,
//!    the record is reset to `count = 0, window_start = now`.
//! 2. If `count >= limit` the request is denied and the record is left as is.
//! 3. Otherwise `count` is incremented and the request is allowed.
//!
//! Steps 1-3 run inside one critical section, so concurrent requests from
//! the same client can never both take the last slot.
//!
//! # Retention
//!
//! Records live for the life of the process unless the store was built
//! with [`InMemoryQuotaStore::with_max_clients`], in which case the record
//! with the oldest `window_start` is evicted once the cap is exceeded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::HeaderMap;
use hookgrade_types::config::QuotaConfig;
use tracing::{debug, warn};

/// Header carrying the caller's address chain when behind a proxy.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Bucket shared by every caller that sends no forwarded address.
pub const UNKNOWN_CLIENT: &str = "unknown";

const DAY: Duration = Duration::from_secs(86_400);

// ── Policy ───────────────────────────────────────────────────────────────

/// Limit and window length applied to every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl QuotaPolicy {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    /// Message shown to callers who hit the limit.
    pub fn exceeded_message(&self) -> String {
        if self.window == DAY {
            format!("Rate limit exceeded ({}/day). Try again tomorrow.", self.limit)
        } else {
            format!(
                "Rate limit exceeded ({} per {}s). Try again later.",
                self.limit,
                self.window.as_secs()
            )
        }
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(100, DAY)
    }
}

impl From<&QuotaConfig> for QuotaPolicy {
    fn from(cfg: &QuotaConfig) -> Self {
        Self::new(cfg.limit, Duration::from_secs(cfg.window_secs))
    }
}

// ── Records and decisions ────────────────────────────────────────────────

/// Per-client counter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaRecord {
    pub count: u32,
    pub window_start: Instant,
}

impl QuotaRecord {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}

/// Outcome of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admitted. `remaining` slots are left in the current window.
    Allowed { remaining: u32 },
    /// Denied until the current window ends, `retry_after` from now.
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

// ── Store ────────────────────────────────────────────────────────────────

/// Storage for quota records.
///
/// Implementations must perform the reset/check/increment sequence
/// atomically per client.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Run one admission attempt for `client_id` at time `now`.
    async fn admit_at(&self, client_id: &str, policy: &QuotaPolicy, now: Instant) -> Admission;
}

/// Process-local quota store.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    records: Mutex<HashMap<String, QuotaRecord>>,
    max_clients: Option<usize>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: cap the number of tracked clients.
    pub fn with_max_clients(mut self, max: usize) -> Self {
        self.max_clients = Some(max.max(1));
        self
    }

    /// Copy of the record for `client_id`, if tracked.
    pub fn snapshot(&self, client_id: &str) -> Option<QuotaRecord> {
        self.lock().get(client_id).copied()
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, QuotaRecord>> {
        // A panic while holding the lock cannot leave a record half
        // written, so the map is still usable.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit_locked(&self, client_id: &str, policy: &QuotaPolicy, now: Instant) -> Admission {
        let mut records = self.lock();

        let is_new = !records.contains_key(client_id);
        let record = records
            .entry(client_id.to_string())
            .or_insert_with(|| QuotaRecord::fresh(now));
        if record.expired(now, policy.window) {
            *record = QuotaRecord::fresh(now);
        }

        if record.count >= policy.limit {
            let elapsed = now.saturating_duration_since(record.window_start);
            return Admission::Denied {
                retry_after: policy.window.saturating_sub(elapsed),
            };
        }

        record.count += 1;
        let remaining = policy.limit - record.count;

        if is_new
            && let Some(max) = self.max_clients
            && records.len() > max
        {
            evict_oldest(&mut records, client_id);
        }

        Admission::Allowed { remaining }
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn admit_at(&self, client_id: &str, policy: &QuotaPolicy, now: Instant) -> Admission {
        self.admit_locked(client_id, policy, now)
    }
}

/// Drop the record with the oldest `window_start`, never `keep`.
fn evict_oldest(records: &mut HashMap<String, QuotaRecord>, keep: &str) {
    let oldest = records
        .iter()
        .filter(|(id, _)| id.as_str() != keep)
        .min_by_key(|(_, r)| r.window_start)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        debug!(client_id = %id, "evicting oldest quota record");
        records.remove(&id);
    }
}

// ── Gate ─────────────────────────────────────────────────────────────────

/// Admits or denies requests according to a [`QuotaPolicy`].
#[derive(Clone)]
pub struct QuotaGate {
    store: Arc<dyn QuotaStore>,
    policy: QuotaPolicy,
}

impl QuotaGate {
    pub fn new(store: Arc<dyn QuotaStore>, policy: QuotaPolicy) -> Self {
        Self { store, policy }
    }

    /// A gate backed by a fresh [`InMemoryQuotaStore`].
    pub fn in_memory(cfg: &QuotaConfig) -> Self {
        let mut store = InMemoryQuotaStore::new();
        if let Some(max) = cfg.max_clients {
            store = store.with_max_clients(max);
        }
        Self::new(Arc::new(store), QuotaPolicy::from(cfg))
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Attempt to admit one request from `client_id` now.
    pub async fn admit(&self, client_id: &str) -> Admission {
        self.admit_at(client_id, Instant::now()).await
    }

    /// Attempt to admit one request from `client_id` at `now`.
    pub async fn admit_at(&self, client_id: &str, now: Instant) -> Admission {
        let admission = self.store.admit_at(client_id, &self.policy, now).await;
        if let Admission::Denied { retry_after } = admission {
            warn!(
                client_id = %client_id,
                limit = self.policy.limit,
                retry_after_secs = retry_after.as_secs(),
                "quota exceeded"
            );
        }
        admission
    }
}

impl std::fmt::Debug for QuotaGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaGate")
            .field("policy", &self.policy)
            .finish()
    }
}

/// Client identifier: the first entry of `x-forwarded-for`, trimmed, or
/// [`UNKNOWN_CLIENT`] when the header is absent or blank.
pub fn client_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
