//! Keyed query cache with in-flight deduplication.
//!
//! A key names a resource plus the parameters that disambiguate it. Concurrent
//! fetches of the same key share one future; results are served until they go
//! stale or are invalidated. Errors are never stored.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use crate::client::error::{ClientError, ClientResult};

/// Resource names used as the first part of every cache key.
pub mod keys {
    pub const MEALS: &str = "meals";
    pub const MEAL: &str = "meal";
    pub const CHEF_MEALS: &str = "chef-meals";
    pub const REVIEWS: &str = "reviews";
    pub const RECENT_REVIEWS: &str = "recent-reviews";
    pub const MY_REVIEWS: &str = "my-reviews";
    pub const FAVORITES: &str = "favorites";
    pub const ORDERS: &str = "orders";
    pub const CHEF_ORDERS: &str = "chef-orders";
    pub const USER: &str = "user";
    pub const ROLE: &str = "role";
    pub const USERS: &str = "users";
    pub const REQUESTS: &str = "requests";
    pub const ADMIN_STATS: &str = "admin-stats";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: &'static str,
    params: Vec<String>,
}

impl CacheKey {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            params: Vec::new(),
        }
    }

    pub fn with(mut self, param: impl ToString) -> Self {
        self.params.push(param.to_string());
        self
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource)?;
        for param in &self.params {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}

type Erased = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Erased, ClientError>>>;

enum Slot {
    Ready { value: Erased, fetched_at: Instant },
    Pending { fetch: SharedFetch, id: u64 },
}

pub struct QueryCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    stale_after: Duration,
    next_id: AtomicU64,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stale_after,
            next_id: AtomicU64::new(1),
        }
    }

    /// Serves `key` from the cache, joins an in-flight fetch of it, or starts
    /// `fetcher`. A fetch whose key was invalidated while it ran still answers
    /// its callers but does not repopulate the cache.
    pub async fn fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let (fetch, id) = {
            let mut slots = self.slots.lock();
            match slots.get(&key) {
                Some(Slot::Ready { value, fetched_at })
                    if fetched_at.elapsed() < self.stale_after =>
                {
                    tracing::trace!(%key, "cache hit");
                    return downcast(value.clone(), &key);
                }
                Some(Slot::Pending { fetch, id }) => {
                    tracing::trace!(%key, "joining in-flight fetch");
                    (fetch.clone(), *id)
                }
                _ => {
                    tracing::debug!(%key, "fetching");
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let fut = fetcher();
                    let fetch = async move { fut.await.map(|value| Arc::new(value) as Erased) }
                        .boxed()
                        .shared();
                    slots.insert(
                        key.clone(),
                        Slot::Pending {
                            fetch: fetch.clone(),
                            id,
                        },
                    );
                    (fetch, id)
                }
            }
        };

        let result = fetch.await;
        self.settle(&key, id, &result);
        result.and_then(|value| downcast(value, &key))
    }

    fn settle(&self, key: &CacheKey, id: u64, result: &Result<Erased, ClientError>) {
        let mut slots = self.slots.lock();
        let current = matches!(slots.get(key), Some(Slot::Pending { id: pending, .. }) if *pending == id);
        if !current {
            return;
        }
        match result {
            Ok(value) => {
                slots.insert(
                    key.clone(),
                    Slot::Ready {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                    },
                );
            }
            Err(err) => {
                tracing::debug!(%key, error = %err, "fetch failed");
                slots.remove(key);
            }
        }
    }

    /// Cached value of `key` if present and fresh, without fetching.
    pub fn peek<T: Clone + Send + Sync + 'static>(&self, key: &CacheKey) -> Option<T> {
        let slots = self.slots.lock();
        match slots.get(key) {
            Some(Slot::Ready { value, fetched_at }) if fetched_at.elapsed() < self.stale_after => {
                value.clone().downcast::<T>().ok().map(|v| (*v).clone())
            }
            _ => None,
        }
    }

    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        matches!(self.slots.lock().get(key), Some(Slot::Pending { .. }))
    }

    pub fn invalidate(&self, key: &CacheKey) {
        if self.slots.lock().remove(key).is_some() {
            tracing::debug!(%key, "invalidated");
        }
    }

    /// Drops every key of `resource`, whatever its parameters.
    pub fn invalidate_resource(&self, resource: &str) {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|key, _| key.resource != resource);
        tracing::debug!(resource, dropped = before - slots.len(), "invalidated resource");
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn downcast<T: Clone + Send + Sync + 'static>(value: Erased, key: &CacheKey) -> ClientResult<T> {
    value
        .downcast::<T>()
        .map(|v| (*v).clone())
        .map_err(|_| ClientError::Decode {
            context: key.to_string(),
            message: "cached value has a different type".to_string(),
        })
}
