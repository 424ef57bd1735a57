//! JWKS fetched from the identity provider.
//!
//! - One snapshot per fetch, held behind `Arc` and never mutated.
//! - `moka` `try_get_with` coalesces concurrent misses into a single fetch;
//!   waiters receive the leader's result.
//! - Fetch errors are not cached; the next request tries again.
//! - An unknown `kid` forces one refetch, but only once the current snapshot
//!   is older than `min_refresh_interval`.
//! - Dropping the caller's future drops the in-flight request. moka lets the
//!   next waiter start its own fetch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use moka::future::Cache;
use url::Url;

use super::jwks::{JwksError, KeyResolver, KeySnapshot, VerificationKey};

#[derive(Debug, Clone)]
pub struct RemoteJwksSettings {
    pub url: Url,
    pub ttl: Duration,
    pub min_refresh_interval: Duration,
    pub fetch_timeout: Duration,
}

impl RemoteJwksSettings {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            ttl: Duration::from_secs(300),
            min_refresh_interval: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
struct CachedKeys {
    snapshot: KeySnapshot,
    fetched_at: Instant,
}

pub struct RemoteJwks {
    http: reqwest::Client,
    url: Url,
    cache: Cache<String, Arc<CachedKeys>>,
    min_refresh_interval: Duration,
}

impl std::fmt::Debug for RemoteJwks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteJwks")
            .field("url", &self.url.as_str())
            .field("min_refresh_interval", &self.min_refresh_interval)
            .finish_non_exhaustive()
    }
}

impl RemoteJwks {
    pub fn new(settings: RemoteJwksSettings) -> Result<Self, JwksError> {
        let http = reqwest::Client::builder()
            .timeout(settings.fetch_timeout)
            .build()
            .map_err(|e| JwksError::Fetch(format!("failed to build http client: {e}")))?;

        Ok(Self::with_client(http, settings))
    }

    pub fn with_client(http: reqwest::Client, settings: RemoteJwksSettings) -> Self {
        let cache = Cache::builder().time_to_live(settings.ttl).build();

        Self {
            http,
            url: settings.url,
            cache,
            min_refresh_interval: settings.min_refresh_interval,
        }
    }

    async fn current(&self) -> Result<Arc<CachedKeys>, JwksError> {
        self.cache
            .try_get_with(self.cache_key(), self.fetch())
            .await
            .map_err(|e| (*e).clone())
    }

    fn cache_key(&self) -> String {
        self.url.as_str().to_string()
    }

    async fn fetch(&self) -> Result<Arc<CachedKeys>, JwksError> {
        tracing::info!(url = %self.url, "fetching signing keys");

        let result = self.fetch_inner().await;
        match &result {
            Ok(cached) => tracing::info!(
                url = %self.url,
                keys = cached.snapshot.len(),
                "signing keys refreshed"
            ),
            Err(e) => tracing::error!(url = %self.url, error = %e, "signing key fetch failed"),
        }

        result
    }

    async fn fetch_inner(&self) -> Result<Arc<CachedKeys>, JwksError> {
        let response = self
            .http
            .get(self.url.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::Fetch(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| JwksError::InvalidKeySet(e.to_string()))?;

        let snapshot = KeySnapshot::from_jwk_set(&set);
        if snapshot.is_empty() {
            return Err(JwksError::InvalidKeySet("no usable signing keys".into()));
        }

        Ok(Arc::new(CachedKeys {
            snapshot,
            fetched_at: Instant::now(),
        }))
    }
}

#[async_trait]
impl KeyResolver for RemoteJwks {
    async fn resolve_key(&self, kid: &str) -> Result<VerificationKey, JwksError> {
        let cached = self.current().await?;
        if let Some(key) = cached.snapshot.get(kid) {
            tracing::debug!(kid, "signing key cache hit");
            return Ok(key.clone());
        }

        if cached.fetched_at.elapsed() < self.min_refresh_interval {
            return Err(JwksError::KeyNotFound(kid.to_string()));
        }

        // Someone else may have refreshed while we were looking.
        let key = self.cache_key();
        if let Some(latest) = self.cache.get(&key).await
            && !Arc::ptr_eq(&latest, &cached)
        {
            return latest
                .snapshot
                .get(kid)
                .cloned()
                .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()));
        }

        tracing::info!(kid, "unknown kid, refreshing signing keys");
        self.cache.invalidate(&key).await;

        let refreshed = self.current().await?;
        refreshed
            .snapshot
            .get(kid)
            .cloned()
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }
}
