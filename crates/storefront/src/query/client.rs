//! Shared query cache.
//!
//! One [`QueryClient`] is created by the application and handed to every
//! [`DataQuery`](super::DataQuery) and [`Mutation`](super::Mutation). Entries
//! hold the raw payload for a [`QueryKey`]; each observer normalizes it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::Op;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use super::key::QueryKey;
use super::policy::CachePolicy;
use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::resource::Resource;

/// First retry delay; doubles per attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// A cached response.
#[derive(Debug, Clone)]
pub struct CachedQuery {
    pub resource: Resource,
    pub raw: Arc<Value>,
    pub fetched_at: Instant,
    pub updated_at: DateTime<Utc>,
    gc_time: Duration,
}

impl CachedQuery {
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// A zero `stale_time` makes every entry stale.
    #[must_use]
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        self.age() >= stale_time
    }
}

type FetchResult = Result<CachedQuery, Arc<ApiError>>;

/// One network fetch, shared by every caller that joins before it lands.
struct Flight {
    resource: Resource,
    result: OnceCell<FetchResult>,
}

/// Whether a fetch may reuse a fresh entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Reuse the entry unless it is stale.
    IfStale,
    /// Always hit the network.
    Force,
}

/// Evicts each entry after its own `gc_time` without reads or writes.
struct IdleExpiry;

impl Expiry<QueryKey, CachedQuery> for IdleExpiry {
    fn expire_after_create(
        &self,
        _key: &QueryKey,
        value: &CachedQuery,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.gc_time)
    }

    fn expire_after_read(
        &self,
        _key: &QueryKey,
        value: &CachedQuery,
        _read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(value.gc_time)
    }

    fn expire_after_update(
        &self,
        _key: &QueryKey,
        value: &CachedQuery,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.gc_time)
    }
}

/// Handle to the query cache and the API client behind it.
///
/// Cheap to clone; all clones share one cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<QueryClientInner>,
}

struct QueryClientInner {
    api: ApiClient,
    cache: Cache<QueryKey, CachedQuery>,
    /// Fetches still on the wire, kept apart from `cache` so callers share
    /// a request even when its result is not retained.
    inflight: Cache<QueryKey, Arc<Flight>>,
}

impl QueryClient {
    /// Create a client holding at most `capacity` entries.
    #[must_use]
    pub fn new(api: ApiClient, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .expire_after(IdleExpiry)
            .build();

        Self {
            inner: Arc::new(QueryClientInner {
                api,
                cache,
                inflight: Cache::new(capacity),
            }),
        }
    }

    /// Build the API client and cache from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(config)?;
        Ok(Self::new(api, config.cache_capacity))
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Current entry for `key`, if one is cached. Counts as a read.
    pub async fn peek(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.inner.cache.get(key).await
    }

    /// Fetch `path` into the entry for `key`.
    ///
    /// Concurrent calls for the same key share one request: a call made
    /// while another is on the wire waits for it and returns its result,
    /// whether or not the policy keeps it. With [`FetchMode::IfStale`], an
    /// entry younger than the policy's `stale_time` is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns the last [`ApiError`] once the policy's retries are used up.
    /// Every caller sharing the request gets the same error.
    #[instrument(skip(self, policy), fields(key = %key, path = %path))]
    pub async fn fetch(
        &self,
        resource: Resource,
        key: &QueryKey,
        path: &str,
        policy: &CachePolicy,
        mode: FetchMode,
    ) -> Result<CachedQuery, Arc<ApiError>> {
        if mode == FetchMode::IfStale
            && let Some(cached) = self.peek(key).await
            && !cached.is_stale(policy.stale_time)
        {
            debug!("Cache hit");
            return Ok(cached);
        }

        let flight = self
            .inner
            .inflight
            .get_with(key.clone(), async {
                Arc::new(Flight {
                    resource,
                    result: OnceCell::new(),
                })
            })
            .await;

        let result = flight
            .result
            .get_or_init(|| self.fetch_and_store(resource, key, path, policy))
            .await
            .clone();
        self.land(key, &flight).await;
        result
    }

    async fn fetch_and_store(
        &self,
        resource: Resource,
        key: &QueryKey,
        path: &str,
        policy: &CachePolicy,
    ) -> FetchResult {
        let raw = self
            .get_with_retry(key, path, policy.retry)
            .await
            .map_err(Arc::new)?;

        let cached = CachedQuery {
            resource,
            raw: Arc::new(raw),
            fetched_at: Instant::now(),
            updated_at: Utc::now(),
            gc_time: policy.gc_time,
        };
        if !policy.gc_time.is_zero() {
            self.inner.cache.insert(key.clone(), cached.clone()).await;
        }
        Ok(cached)
    }

    /// Retire `flight` unless a newer one already replaced it.
    async fn land(&self, key: &QueryKey, flight: &Arc<Flight>) {
        self.inner
            .inflight
            .entry(key.clone())
            .and_compute_with(|current| async move {
                match current {
                    Some(entry) if Arc::ptr_eq(entry.value(), flight) => Op::Remove,
                    _ => Op::Nop,
                }
            })
            .await;
    }

    async fn get_with_retry(
        &self,
        key: &QueryKey,
        path: &str,
        retries: u32,
    ) -> Result<Value, ApiError> {
        let mut attempt = 0;
        loop {
            match self.inner.api.get::<Value>(path).await {
                Ok(raw) => return Ok(raw),
                Err(e) if attempt < retries && e.is_retryable() => {
                    attempt += 1;
                    let delay = retry_delay(attempt, &e);
                    warn!(
                        key = %key,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Drop every entry tagged with `resource`, plus its collection key.
    pub async fn invalidate(&self, resource: Resource) {
        let list_key = QueryKey::for_resource(resource);
        let keys: Vec<Arc<QueryKey>> = self
            .inner
            .cache
            .iter()
            .filter(|(key, entry)| entry.resource == resource || **key == list_key)
            .map(|(key, _)| key)
            .collect();

        for key in &keys {
            self.inner.cache.invalidate(&**key).await;
        }
        self.inner.cache.invalidate(&list_key).await;

        // Requests already on the wire may predate the write.
        let flights: Vec<Arc<QueryKey>> = self
            .inner
            .inflight
            .iter()
            .filter(|(key, flight)| flight.resource == resource || **key == list_key)
            .map(|(key, _)| key)
            .collect();
        for key in &flights {
            self.inner.inflight.invalidate(&**key).await;
        }
        debug!(resource = %resource, count = keys.len(), "Invalidated cache entries");
    }

    /// Drop the entry for one key.
    pub async fn invalidate_key(&self, key: &QueryKey) {
        self.inner.cache.invalidate(key).await;
        self.inner.inflight.invalidate(key).await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.cache.invalidate_all();
        self.inner.inflight.invalidate_all();
        info!("Query cache cleared");
    }

    /// Approximate number of live entries.
    pub async fn entry_count(&self) -> u64 {
        self.inner.cache.run_pending_tasks().await;
        self.inner.cache.entry_count()
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("api", &self.inner.api)
            .field("entries", &self.inner.cache.entry_count())
            .finish()
    }
}

/// Exponential backoff, honouring `Retry-After` up to the same cap.
fn retry_delay(attempt: u32, error: &ApiError) -> Duration {
    let backoff = BASE_BACKOFF
        .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
        .min(MAX_BACKOFF);
    match error {
        ApiError::RateLimited(secs) => backoff.max(Duration::from_secs(*secs).min(MAX_BACKOFF)),
        _ => backoff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let e = ApiError::Status(503);
        assert_eq!(retry_delay(1, &e), Duration::from_millis(100));
        assert_eq!(retry_delay(2, &e), Duration::from_millis(200));
        assert_eq!(retry_delay(4, &e), Duration::from_millis(800));
        assert_eq!(retry_delay(10, &e), MAX_BACKOFF);
        assert_eq!(retry_delay(u32::MAX, &e), MAX_BACKOFF);
    }

    #[test]
    fn test_rate_limit_delay_is_capped() {
        assert_eq!(retry_delay(1, &ApiError::RateLimited(1)), Duration::from_secs(1));
        assert_eq!(retry_delay(1, &ApiError::RateLimited(60)), MAX_BACKOFF);
    }

    #[test]
    fn test_zero_stale_time_is_always_stale() {
        let entry = CachedQuery {
            resource: Resource::Orders,
            raw: Arc::new(Value::Null),
            fetched_at: Instant::now(),
            updated_at: Utc::now(),
            gc_time: Duration::ZERO,
        };
        assert!(entry.is_stale(Duration::ZERO));
        assert!(!entry.is_stale(Duration::from_secs(60)));
    }
}
