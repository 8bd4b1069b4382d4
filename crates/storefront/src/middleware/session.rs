//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Sessions hold the
//! visitor's cart, checkout progress, placed orders and mock sign-in, and
//! are lost when the server restarts.
//!
//! Records live in a `moka` cache that evicts each one when its expiry date
//! passes. Records are weighed by the size of their stored values and the
//! cache holds at most `SESSION_CACHE_MB` of them, so abandoned sessions and
//! pending listing images do not accumulate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, session_store};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shophub_session";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Fixed cost charged per record on top of its stored values.
const RECORD_OVERHEAD: usize = 128;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<CacheStore> {
    let store = CacheStore::new(config.session_cache_bytes());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(
                config.session_expiry_days.saturating_mul(SECONDS_PER_DAY),
            ),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Time left before a record expires, zero if it already has.
fn time_to_live(record: &Record) -> Duration {
    Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
}

/// Approximate bytes held by a record.
fn weigh(_id: &Id, record: &Record) -> u32 {
    let bytes = record.data.iter().fold(RECORD_OVERHEAD, |total, (key, value)| {
        let value_len = match value {
            Value::String(s) => s.len(),
            other => other.to_string().len(),
        };
        total.saturating_add(key.len()).saturating_add(value_len)
    });
    u32::try_from(bytes).unwrap_or(u32::MAX)
}

/// Per-entry expiry following each record's `expiry_date`.
struct RecordExpiry;

impl moka::Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(&self, _id: &Id, record: &Record, _created_at: Instant) -> Option<Duration> {
        Some(time_to_live(record))
    }

    // Saving a session pushes its expiry date forward.
    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(time_to_live(record))
    }
}

/// Bounded in-memory session store.
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache: Cache<Id, Record>,
}

impl CacheStore {
    /// Create a store holding roughly `max_bytes` of session data.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_bytes)
            .weigher(weigh)
            .expire_after(RecordExpiry)
            .build();
        Self { cache }
    }

    /// Store a record, or drop it if it has already expired.
    async fn put(&self, record: &Record) {
        if time_to_live(record).is_zero() {
            self.cache.invalidate(&record.id).await;
        } else {
            self.cache.insert(record.id, record.clone()).await;
        }
    }
}

#[async_trait]
impl SessionStore for CacheStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.put(record).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.put(record).await;
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(id).await;
        Ok(())
    }
}
