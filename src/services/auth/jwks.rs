//! Signing-key resolution.
//!
//! `KeyResolver` is the seam between token verification and wherever the
//! identity provider's keys come from. `StaticKeySet` serves a fixed set
//! (pinned keys, tests); `RemoteJwks` fetches and caches the published set.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum JwksError {
    #[error("signing key '{0}' not found")]
    KeyNotFound(String),

    #[error("failed to fetch key set: {0}")]
    Fetch(String),

    #[error("key set response is invalid: {0}")]
    InvalidKeySet(String),
}

/// Public key ready for signature verification.
#[derive(Clone)]
pub struct VerificationKey {
    pub key: DecodingKey,
    /// `alg` pinned by the JWK, if it declared one.
    pub algorithm: Option<Algorithm>,
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("VerificationKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve_key(&self, kid: &str) -> Result<VerificationKey, JwksError>;
}

/// Immutable kid → key map built from one JWKS document.
#[derive(Debug, Clone, Default)]
pub struct KeySnapshot {
    keys: HashMap<String, VerificationKey>,
}

impl KeySnapshot {
    /// Unusable entries (no `kid`, encryption keys, unsupported key types or
    /// algorithms) are skipped, not fatal.
    pub fn from_jwk_set(set: &JwkSet) -> Self {
        let keys = set
            .keys
            .iter()
            .filter_map(|jwk| match verification_key(jwk) {
                Ok(entry) => Some(entry),
                Err(reason) => {
                    tracing::debug!(
                        kid = jwk.common.key_id.as_deref().unwrap_or("<none>"),
                        reason,
                        "skipping jwk"
                    );
                    None
                }
            })
            .collect();

        Self { keys }
    }

    pub fn get(&self, kid: &str) -> Option<&VerificationKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn verification_key(jwk: &Jwk) -> Result<(String, VerificationKey), &'static str> {
    let kid = jwk.common.key_id.clone().ok_or("missing kid")?;

    if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
        return Err("encryption key");
    }

    // KeyAlgorithm also covers encryption algorithms; only signing ones map
    // onto `Algorithm`.
    let algorithm = match &jwk.common.key_algorithm {
        Some(declared) => {
            let value = serde_json::to_value(declared).map_err(|_| "unreadable alg")?;
            Some(serde_json::from_value::<Algorithm>(value).map_err(|_| "non-signing alg")?)
        }
        None => None,
    };

    let key = DecodingKey::from_jwk(jwk).map_err(|_| "unsupported key material")?;

    Ok((kid, VerificationKey { key, algorithm }))
}

/// Fixed key set. Never refreshes.
#[derive(Debug, Clone)]
pub struct StaticKeySet {
    snapshot: Arc<KeySnapshot>,
}

impl StaticKeySet {
    pub fn new(set: &JwkSet) -> Self {
        Self {
            snapshot: Arc::new(KeySnapshot::from_jwk_set(set)),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, JwksError> {
        let set: JwkSet =
            serde_json::from_str(json).map_err(|e| JwksError::InvalidKeySet(e.to_string()))?;
        Ok(Self::new(&set))
    }
}

#[async_trait]
impl KeyResolver for StaticKeySet {
    async fn resolve_key(&self, kid: &str) -> Result<VerificationKey, JwksError> {
        self.snapshot
            .get(kid)
            .cloned()
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }
}
