//! Per-view query observers.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use super::client::{CachedQuery, FetchMode, QueryClient};
use super::key::QueryKey;
use super::policy::{CacheClass, CachePolicy, QueryOverrides};
use crate::api::ApiError;
use crate::normalize::{Normalized, normalize_or_raw};
use crate::resource::Resource;

/// What a [`DataQuery`] reads and how it caches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    pub resource: Resource,
    /// Concrete API path, e.g. `/api/users/42`.
    pub path: String,
    pub class: CacheClass,
    /// While false, `load` makes no request.
    pub enabled: bool,
    /// When false, data is handed out as [`Normalized::Raw`].
    pub normalize: bool,
    pub overrides: QueryOverrides,
}

impl DataRequest {
    #[must_use]
    pub fn new(resource: Resource, path: impl Into<String>, class: CacheClass) -> Self {
        Self {
            resource,
            path: path.into(),
            class,
            enabled: true,
            normalize: true,
            overrides: QueryOverrides::default(),
        }
    }

    /// Request for a resource's collection endpoint.
    #[must_use]
    pub fn list(resource: Resource, class: CacheClass) -> Self {
        Self::new(resource, resource.list_path(), class)
    }

    /// Request for a single record.
    #[must_use]
    pub fn detail(resource: Resource, id: &str, class: CacheClass) -> Self {
        Self::new(resource, resource.detail_path(id), class)
    }

    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Skip normalization.
    #[must_use]
    pub const fn raw(mut self) -> Self {
        self.normalize = false;
        self
    }

    #[must_use]
    pub const fn with_overrides(mut self, overrides: QueryOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Snapshot of a query as the UI sees it.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub data: Option<Arc<Normalized>>,
    /// No data yet and a fetch is in flight.
    pub is_loading: bool,
    /// Failure of the most recent fetch. Earlier data is kept alongside it.
    pub error: Option<Arc<ApiError>>,
    pub is_fetching: bool,
    pub is_stale: bool,
    /// Wall-clock time the current data was fetched.
    pub updated_at: Option<DateTime<Utc>>,
    fetched_at: Option<Instant>,
}

impl QueryState {
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Number of records held; 0 without data.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.as_deref().map_or(0, Normalized::count)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Observer bound to one [`DataRequest`].
///
/// State changes are published on a watch channel; see [`DataQuery::subscribe`].
/// Dropping a `load` or `refetch` future cancels its request.
pub struct DataQuery {
    client: QueryClient,
    request: DataRequest,
    key: QueryKey,
    policy: CachePolicy,
    state: watch::Sender<QueryState>,
}

impl DataQuery {
    #[must_use]
    pub fn new(client: QueryClient, request: DataRequest) -> Self {
        let key = QueryKey::resolve(&request.path);
        let policy = request.class.policy().with_overrides(&request.overrides);
        let state = watch::Sender::new(QueryState {
            is_loading: request.enabled,
            is_stale: true,
            ..QueryState::default()
        });

        Self {
            client,
            request,
            key,
            policy,
            state,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub const fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    #[must_use]
    pub const fn request(&self) -> &DataRequest {
        &self.request
    }

    /// Current state, with staleness evaluated now.
    #[must_use]
    pub fn state(&self) -> QueryState {
        let mut state = self.state.borrow().clone();
        state.is_stale = state
            .fetched_at
            .is_none_or(|at| at.elapsed() >= self.policy.stale_time);
        state
    }

    /// Receiver for state updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Toggle the query. Re-enabling a query without data marks it loading
    /// again, as a freshly created one would be.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.request.enabled = enabled;
        self.state
            .send_modify(|s| s.is_loading = enabled && s.data.is_none());
    }

    /// Serve from cache when fresh, otherwise fetch.
    ///
    /// Never fails; errors land in [`QueryState::error`].
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> QueryState {
        if !self.request.enabled {
            debug!("Query disabled, skipping load");
            self.state.send_modify(|s| {
                s.is_loading = false;
                s.is_fetching = false;
            });
            return self.state();
        }

        if let Some(entry) = self.client.peek(&self.key).await
            && !entry.is_stale(self.policy.stale_time)
        {
            debug!("Cache hit");
            self.apply(&entry);
            return self.state();
        }

        self.run(FetchMode::IfStale).await
    }

    /// Fetch from the network regardless of freshness.
    ///
    /// Runs even while the query is disabled.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn refetch(&self) -> QueryState {
        self.run(FetchMode::Force).await
    }

    /// Window regained focus: refetch if the policy asks for it and the data
    /// is stale.
    pub async fn focus(&self) -> QueryState {
        if self.request.enabled && self.policy.refetch_on_window_focus && self.state().is_stale {
            return self.run(FetchMode::IfStale).await;
        }
        self.state()
    }

    async fn run(&self, mode: FetchMode) -> QueryState {
        self.state.send_modify(|s| {
            s.is_fetching = true;
            s.is_loading = s.data.is_none();
        });
        let mut guard = FetchingGuard {
            state: &self.state,
            armed: true,
        };

        let result = self
            .client
            .fetch(
                self.request.resource,
                &self.key,
                &self.request.path,
                &self.policy,
                mode,
            )
            .await;
        guard.armed = false;

        match result {
            Ok(entry) => self.apply(&entry),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Query failed");
                self.state.send_modify(|s| {
                    s.error = Some(e);
                    s.is_fetching = false;
                    s.is_loading = false;
                });
            }
        }
        self.state()
    }

    fn apply(&self, entry: &CachedQuery) {
        let current = self.state.borrow().fetched_at;
        let data = if current == Some(entry.fetched_at) {
            None
        } else {
            Some(Arc::new(self.decode(&entry.raw)))
        };

        self.state.send_modify(|s| {
            if let Some(data) = data {
                s.data = Some(data);
            }
            s.error = None;
            s.is_loading = false;
            s.is_fetching = false;
            s.fetched_at = Some(entry.fetched_at);
            s.updated_at = Some(entry.updated_at);
        });
    }

    fn decode(&self, raw: &Value) -> Normalized {
        if self.request.normalize {
            normalize_or_raw(self.request.resource, raw)
        } else {
            Normalized::Raw(raw.clone())
        }
    }
}

impl std::fmt::Debug for DataQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataQuery")
            .field("key", &self.key)
            .field("request", &self.request)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flags when a fetch future is dropped before finishing.
struct FetchingGuard<'a> {
    state: &'a watch::Sender<QueryState>,
    armed: bool,
}

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_modify(|s| {
            s.is_fetching = false;
            s.is_loading = false;
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::StorefrontConfig;

    fn client() -> QueryClient {
        let config = StorefrontConfig::new("http://127.0.0.1:9");
        QueryClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_request_builders() {
        let request = DataRequest::detail(Resource::Users, "42", CacheClass::UserSpecific)
            .enabled(false)
            .raw();
        assert_eq!(request.path, "/api/users/42");
        assert!(!request.enabled);
        assert!(!request.normalize);
    }

    #[test]
    fn test_initial_state_follows_enabled() {
        let enabled = DataQuery::new(
            client(),
            DataRequest::list(Resource::Products, CacheClass::Static),
        );
        assert!(enabled.state().is_loading);
        assert!(enabled.state().is_stale);
        assert_eq!(enabled.key().as_str(), "products");

        let disabled = DataQuery::new(
            client(),
            DataRequest::list(Resource::Products, CacheClass::Static).enabled(false),
        );
        assert!(!disabled.state().is_loading);
    }

    #[tokio::test]
    async fn test_disabled_load_is_idle() {
        let query = DataQuery::new(
            client(),
            DataRequest::list(Resource::Orders, CacheClass::UserSpecific).enabled(false),
        );
        let state = query.load().await;
        assert!(!state.is_loading);
        assert!(!state.is_fetching);
        assert!(!state.has_data());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_reenabling_without_data_is_loading() {
        let mut query = DataQuery::new(
            client(),
            DataRequest::list(Resource::Coupons, CacheClass::Dynamic).enabled(false),
        );
        let rx = query.subscribe();
        assert!(!rx.borrow().is_loading);

        query.set_enabled(true);
        assert!(rx.borrow().is_loading);
        assert!(query.state().is_loading);

        query.set_enabled(false);
        assert!(!query.state().is_loading);
    }

    #[test]
    fn test_overrides_apply_to_policy() {
        let request = DataRequest::list(Resource::Reviews, CacheClass::Dynamic).with_overrides(
            QueryOverrides {
                retry: Some(5),
                ..QueryOverrides::default()
            },
        );
        let query = DataQuery::new(client(), request);
        assert_eq!(query.policy().retry, 5);
        assert!(query.policy().refetch_on_window_focus);
    }

    #[test]
    fn test_state_counts() {
        let state = QueryState {
            data: Some(Arc::new(Normalized::Raw(json!([1, 2])))),
            ..QueryState::default()
        };
        assert!(state.has_data());
        assert_eq!(state.count(), 2);
        assert!(!state.is_empty());
        assert!(QueryState::default().is_empty());
    }
}
