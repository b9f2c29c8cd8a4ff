use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};

use super::VerifyError;

/// Shortest gap between two fetches triggered by unknown `kid`s
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

struct CachedKeys {
    set: JwkSet,
    fetched_at: Option<Instant>,
}

/// Public signing keys fetched from a JWKS endpoint. A token naming a `kid`
/// the cache does not hold triggers a refetch, at most once per refresh
/// interval; one fetch runs at a time.
pub struct JwksCache {
    url: String,
    client: reqwest::Client,
    min_refresh: Duration,
    keys: RwLock<CachedKeys>,
    refresh: Mutex<()>,
}

impl JwksCache {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            min_refresh: MIN_REFRESH_INTERVAL,
            keys: RwLock::new(CachedKeys {
                set: JwkSet { keys: Vec::new() },
                fetched_at: None,
            }),
            refresh: Mutex::new(()),
        }
    }

    pub fn with_min_refresh(mut self, interval: Duration) -> Self {
        self.min_refresh = interval;
        self
    }

    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        if let Some(key) = self.cached_key(kid).await {
            return key;
        }

        let _refreshing = self.refresh.lock().await;

        // Another task may have refreshed while we waited
        {
            let cached = self.keys.read().await;
            if let Some(jwk) = cached.set.find(kid) {
                return to_decoding_key(kid, jwk);
            }
            if cached.fetched_at.map_or(false, |at| at.elapsed() < self.min_refresh) {
                return Err(unknown_kid(kid));
            }
        }

        let fetched = self.fetch().await?;
        let mut cached = self.keys.write().await;
        *cached = CachedKeys {
            set: fetched,
            fetched_at: Some(Instant::now()),
        };

        match cached.set.find(kid) {
            Some(jwk) => to_decoding_key(kid, jwk),
            None => Err(unknown_kid(kid)),
        }
    }

    async fn cached_key(&self, kid: &str) -> Option<Result<DecodingKey, VerifyError>> {
        let cached = self.keys.read().await;
        cached.set.find(kid).map(|jwk| to_decoding_key(kid, jwk))
    }

    async fn fetch(&self) -> Result<JwkSet, VerifyError> {
        tracing::debug!("Fetching signing keys from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VerifyError::Unavailable(format!("fetching {}: {}", self.url, e)))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| VerifyError::Unavailable(format!("decoding {}: {}", self.url, e)))
    }
}

fn to_decoding_key(kid: &str, jwk: &jsonwebtoken::jwk::Jwk) -> Result<DecodingKey, VerifyError> {
    DecodingKey::from_jwk(jwk).map_err(|e| VerifyError::Unavailable(format!("unusable key '{}': {}", kid, e)))
}

fn unknown_kid(kid: &str) -> VerifyError {
    VerifyError::InvalidToken(format!("unknown signing key '{}'", kid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{routing::get, Json, Router};
    use serde_json::json;

    /// Serves an empty key set and counts requests
    async fn key_endpoint(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/keys",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "keys": [] }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}/keys", addr)
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable_not_invalid() {
        let port = portpicker::pick_unused_port().expect("free port");
        let cache = JwksCache::new(format!("http://127.0.0.1:{}/keys", port));
        let err = cache.decoding_key("any").await.err().expect("should fail");
        assert!(matches!(err, VerifyError::Unavailable(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn unknown_kids_fetch_once_per_interval() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cache = JwksCache::new(key_endpoint(hits.clone()).await);

        for i in 0..50 {
            let err = cache.decoding_key(&format!("forged-{}", i)).await.err().expect("unknown kid");
            assert!(matches!(err, VerifyError::InvalidToken(_)), "got {:?}", err);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(JwksCache::new(key_endpoint(hits.clone()).await));

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.decoding_key(&format!("forged-{}", i)).await.is_err() })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refetches_once_the_interval_has_passed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cache = JwksCache::new(key_endpoint(hits.clone()).await).with_min_refresh(Duration::ZERO);

        assert!(cache.decoding_key("a").await.is_err());
        assert!(cache.decoding_key("b").await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
