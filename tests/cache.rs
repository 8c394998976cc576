use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use local_chef_bazaar::client::{
    cache::{CacheKey, QueryCache, keys},
    error::ClientError,
};
use tokio::sync::oneshot;

fn counting_fetch(
    calls: &Arc<AtomicUsize>,
    value: u32,
) -> impl Future<Output = Result<u32, ClientError>> + Send + 'static {
    let calls = calls.clone();
    async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(value)
    }
}

#[tokio::test]
async fn concurrent_fetches_of_one_key_share_a_request() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(keys::MEAL).with("m-1");

    let (a, b, c) = tokio::join!(
        cache.fetch(key.clone(), || counting_fetch(&calls, 7)),
        cache.fetch(key.clone(), || counting_fetch(&calls, 8)),
        cache.fetch(key.clone(), || counting_fetch(&calls, 9)),
    );
    assert_eq!((a, b, c), (Ok(7), Ok(7), Ok(7)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Served from the cache until invalidated.
    assert_eq!(cache.fetch(key.clone(), || counting_fetch(&calls, 10)).await, Ok(7));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.invalidate(&key);
    assert_eq!(cache.fetch(key, || counting_fetch(&calls, 11)).await, Ok(11));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn errors_are_not_cached() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let key = CacheKey::new(keys::ADMIN_STATS);

    let failed: Result<u32, _> = cache
        .fetch(key.clone(), || async {
            Err(ClientError::Network("connection refused".into()))
        })
        .await;
    assert!(failed.is_err());
    assert!(cache.is_empty());

    let ok = cache.fetch(key.clone(), || async { Ok(3u32) }).await;
    assert_eq!(ok, Ok(3));
    assert_eq!(cache.peek::<u32>(&key), Some(3));
}

#[tokio::test]
async fn stale_entries_are_refetched() {
    let cache = QueryCache::new(Duration::from_millis(10));
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new(keys::RECENT_REVIEWS);

    cache
        .fetch(key.clone(), || counting_fetch(&calls, 1))
        .await
        .expect("first fetch");
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(cache.peek::<u32>(&key), None);

    let again = cache.fetch(key, || counting_fetch(&calls, 2)).await;
    assert_eq!(again, Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalidated_in_flight_fetch_does_not_repopulate() {
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let key = CacheKey::new(keys::REVIEWS).with("m-1");
    let (release, released) = oneshot::channel::<()>();

    let pending = {
        let cache = cache.clone();
        let key = key.clone();
        tokio::spawn(async move {
            cache
                .fetch(key, || async move {
                    released.await.ok();
                    Ok(vec!["old review".to_string()])
                })
                .await
        })
    };

    while !cache.is_fetching(&key) {
        tokio::task::yield_now().await;
    }
    cache.invalidate(&key);
    release.send(()).ok();

    let old = pending.await.expect("fetch task");
    assert_eq!(old, Ok(vec!["old review".to_string()]));
    assert_eq!(cache.peek::<Vec<String>>(&key), None);
}

#[tokio::test]
async fn resource_invalidation_drops_every_parameterization() {
    let cache = QueryCache::new(Duration::from_secs(60));
    for page in 1..=3 {
        let key = CacheKey::new(keys::MEALS).with(page).with(9);
        cache
            .fetch(key, move || async move { Ok(page) })
            .await
            .expect("page fetch");
    }
    let meal = CacheKey::new(keys::MEAL).with("m-1");
    cache
        .fetch(meal.clone(), || async { Ok(1) })
        .await
        .expect("meal fetch");
    assert_eq!(cache.len(), 4);

    cache.invalidate_resource(keys::MEALS);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.peek::<i32>(&meal), Some(1));
}

#[test]
fn keys_render_resource_and_params() {
    let key = CacheKey::new(keys::MEALS).with(2).with(9).with("rice").with("asc");
    assert_eq!(key.to_string(), "meals/2/9/rice/asc");
    assert_eq!(key.resource(), keys::MEALS);
}
