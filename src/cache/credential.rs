//! Process-lifetime credential cache.
//!
//! Upstream credentials (login cookies, bearer tokens) are expensive to
//! acquire, so one cache instance is constructed at process start and
//! handed by reference to every consumer. Entries move through
//! Empty -> Valid -> Expired -> Empty on TTL, with a forced-invalid
//! transition when a consumer observes the upstream rejecting the cached
//! value.
//!
//! Concurrent misses are not deduplicated: two callers may both run the
//! refresh and overwrite each other's entry. Cached values are
//! interchangeable (any valid credential works), so last write wins.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};

struct CachedCredential {
    value: String,
    expires_at: Instant,
}

/// Thread-safe in-memory cache of upstream credentials, keyed by consumer.
#[derive(Default)]
pub struct CredentialCache {
    entries: RwLock<HashMap<String, CachedCredential>>,
}

impl CredentialCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if unexpired, otherwise run
    /// `refresh`, store its result with a `now + ttl` expiry, and return it.
    pub async fn get_or_refresh<F, Fut>(&self, key: &str, ttl: Duration, refresh: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if let Some(value) = self.get_valid(key) {
            return Ok(value);
        }

        debug!(key, "credential cache miss, refreshing");
        let value = refresh().await?;
        self.entries.write().insert(
            key.to_string(),
            CachedCredential {
                value: value.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(value)
    }

    /// Drop the entry for `key`, forcing the next read to refresh.
    pub fn invalidate(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Perform an upstream request with a cached credential, retrying
    /// exactly once with a fresh credential if the upstream rejects the
    /// cached one. A second rejection is fatal for this request - never
    /// retried again, so a persistently failing upstream cannot loop.
    pub async fn request_with_retry<F, Fut, S, SFut, T, P>(
        &self,
        key: &str,
        ttl: Duration,
        refresh: F,
        send: S,
        is_unauthorized: P,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<String>>,
        S: Fn(String) -> SFut,
        SFut: Future<Output = Result<T>>,
        P: Fn(&T) -> bool,
    {
        let credential = self.get_or_refresh(key, ttl, &refresh).await?;
        let response = send(credential).await?;
        if !is_unauthorized(&response) {
            return Ok(response);
        }

        warn!(key, "upstream rejected cached credential, refreshing once");
        self.invalidate(key);
        let fresh = self.get_or_refresh(key, ttl, &refresh).await?;
        let retried = send(fresh).await?;
        if is_unauthorized(&retried) {
            return Err(Error::Auth(format!(
                "upstream rejected a freshly acquired credential for '{key}'"
            )));
        }
        Ok(retried)
    }

    fn get_valid(&self, key: &str) -> Option<String> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        (Instant::now() < entry.expires_at).then(|| entry.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(60);

    fn counting_refresh(calls: Arc<AtomicUsize>) -> impl Fn() -> std::future::Ready<Result<String>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(Ok(format!("tok-{n}")))
        }
    }

    #[tokio::test]
    async fn unexpired_entry_skips_refresh() {
        let cache = CredentialCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_refresh("mtn", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();
        let second = cache
            .get_or_refresh("mtn", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();

        assert_eq!(first, "tok-1");
        assert_eq!(second, "tok-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_exactly_one_refresh() {
        let cache = CredentialCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let ttl = Duration::from_millis(20);

        let first = cache
            .get_or_refresh("mtn", ttl, counting_refresh(calls.clone()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = cache
            .get_or_refresh("mtn", ttl, counting_refresh(calls.clone()))
            .await
            .unwrap();

        assert_eq!(first, "tok-1");
        assert_eq!(second, "tok-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = CredentialCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let a = cache
            .get_or_refresh("crm", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();
        let b = cache
            .get_or_refresh("mtn", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let cache = CredentialCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_refresh("mtn", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();
        cache.invalidate("mtn");
        let value = cache
            .get_or_refresh("mtn", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();

        assert_eq!(value, "tok-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_failure_propagates_and_caches_nothing() {
        let cache = CredentialCache::new();

        let result = cache
            .get_or_refresh("mtn", TTL, || {
                std::future::ready(Err(Error::Auth("login failed".into())))
            })
            .await;
        assert!(result.is_err());

        // A later successful refresh is not shadowed by the failure.
        let calls = Arc::new(AtomicUsize::new(0));
        let value = cache
            .get_or_refresh("mtn", TTL, counting_refresh(calls.clone()))
            .await
            .unwrap();
        assert_eq!(value, "tok-1");
    }

    #[tokio::test]
    async fn rejected_credential_retries_exactly_once() {
        let cache = CredentialCache::new();
        let refreshes = Arc::new(AtomicUsize::new(0));
        let sends = AtomicUsize::new(0);

        // The upstream rejects every credential; the outer call must stop
        // after one forced retry.
        let result: Result<u16> = cache
            .request_with_retry(
                "mtn",
                TTL,
                counting_refresh(refreshes.clone()),
                |_credential| {
                    sends.fetch_add(1, Ordering::SeqCst);
                    std::future::ready(Ok(401u16))
                },
                |status| *status == 401,
            )
            .await;

        assert!(matches!(result, Err(Error::Auth(_))));
        assert_eq!(sends.load(Ordering::SeqCst), 2);
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn accepted_credential_sends_once() {
        let cache = CredentialCache::new();
        let refreshes = Arc::new(AtomicUsize::new(0));
        let sends = AtomicUsize::new(0);

        let status = cache
            .request_with_retry(
                "mtn",
                TTL,
                counting_refresh(refreshes.clone()),
                |_credential| {
                    sends.fetch_add(1, Ordering::SeqCst);
                    std::future::ready(Ok(200u16))
                },
                |status| *status == 401,
            )
            .await
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(sends.load(Ordering::SeqCst), 1);
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_with_fresh_credential() {
        let cache = CredentialCache::new();
        let refreshes = Arc::new(AtomicUsize::new(0));

        // Pre-populate with a credential the upstream has since revoked.
        cache
            .get_or_refresh("mtn", TTL, counting_refresh(refreshes.clone()))
            .await
            .unwrap();

        let accepted = cache
            .request_with_retry(
                "mtn",
                TTL,
                counting_refresh(refreshes.clone()),
                |credential| std::future::ready(Ok(credential)),
                |credential: &String| credential == "tok-1",
            )
            .await
            .unwrap();

        assert_eq!(accepted, "tok-2");
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);
    }
}
