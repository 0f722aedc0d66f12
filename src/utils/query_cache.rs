use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ApiError;

/// Server lists and entities keyed by caller + resource + filters.
///
/// Entries are scoped to the user whose token loaded them, since the backend
/// authorizes per token. Identical concurrent loads by one user share a single
/// backend call, entries go stale after the TTL, and writes drop every key under
/// a resource prefix for all users.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<(u64, String), Arc<Value>>,
}

/// `resource` alone, or `resource?{filters as json}`.
pub fn query_key<P: Serialize + ?Sized>(resource: &str, params: &P) -> String {
    match serde_json::to_string(params) {
        Ok(p) if p != "null" && p != "{}" => format!("{resource}?{p}"),
        _ => resource.to_string(),
    }
}

impl QueryCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self { inner }
    }

    /// Cached value for `key` as seen by `user_id`, loading it with `fetch` on a miss.
    pub async fn get_or_fetch<T, F>(&self, user_id: u64, key: String, fetch: F) -> Result<T, Arc<ApiError>>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ApiError>>,
    {
        let value = self
            .inner
            .try_get_with((user_id, key.clone()), async {
                debug!(key = %key, user_id, "Query cache miss");
                let fresh = fetch.await?;
                Ok::<_, ApiError>(Arc::new(serde_json::to_value(&fresh)?))
            })
            .await?;

        T::deserialize(value.as_ref()).map_err(|e| Arc::new(ApiError::Decode(e)))
    }

    /// Drops `resource` and every key nested under it (`employees` also clears
    /// `employees/5/salary-history`), whoever loaded them.
    pub fn invalidate(&self, resource: &str) {
        let exact = resource.to_string();
        let nested = [format!("{resource}?"), format!("{resource}/")];
        let result = self.inner.invalidate_entries_if(move |(_, key), _| {
            key == &exact || nested.iter().any(|p| key.starts_with(p))
        });

        match result {
            Ok(_) => debug!(resource, "Query cache invalidated"),
            Err(e) => warn!(resource, error = %e, "Query cache invalidation failed"),
        }
    }
}
