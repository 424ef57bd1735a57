use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation};
use serde_json::{Map, Value};

use super::claims::Claims;
use super::error::AuthError;
use super::jwks::KeyResolver;

/// What a token must satisfy to be accepted.
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    pub issuer: String,
    pub audience: String,
    /// Allowed asymmetric algorithms. Anything else is rejected before any
    /// key lookup.
    pub algorithms: Vec<Algorithm>,
    /// Clock-skew tolerance applied to `exp`.
    pub leeway_seconds: u64,
}

impl TokenPolicy {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            leeway_seconds: 0,
        }
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        // Pinned to the header's algorithm, already checked against the
        // allow-list. jsonwebtoken requires every listed algorithm to match
        // the key family.
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Expiry is checked after issuer/audience, with a strict bound.
        validation.validate_exp = false;
        validation.leeway = self.leeway_seconds;
        validation
    }
}

/// Verifies signed access tokens against keys from a `KeyResolver`.
#[derive(Clone)]
pub struct TokenVerifier {
    policy: TokenPolicy,
    keys: Arc<dyn KeyResolver>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(policy: TokenPolicy, keys: Arc<dyn KeyResolver>) -> Self {
        Self { policy, keys }
    }

    /// Verify and decode a compact JWS.
    ///
    /// Order: algorithm allow-list, key lookup, signature, registered claims
    /// (issuer, audience), expiry, claims shape. The first failure is
    /// returned.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        if !self.policy.algorithms.contains(&header.alg) {
            return Err(AuthError::DisallowedAlgorithm(format!("{:?}", header.alg)));
        }

        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;
        let key = self.keys.resolve_key(kid).await?;

        if key.algorithm.is_some_and(|pinned| pinned != header.alg) {
            return Err(AuthError::KeyAlgorithmMismatch);
        }

        // Decoded untyped so registered-claim failures surface as 401
        // before the payload's shape is looked at.
        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &key.key,
            &self.policy.validation(header.alg),
        )?;
        let payload = data.claims;

        let exp = payload
            .get("exp")
            .and_then(Value::as_u64)
            .ok_or_else(|| AuthError::ClaimsMismatch("exp".to_string()))?;
        if !is_unexpired(exp, self.policy.leeway_seconds, now()) {
            return Err(AuthError::Expired);
        }

        serde_json::from_value(Value::Object(payload))
            .map_err(|e| AuthError::MalformedClaims(e.to_string()))
    }
}

fn now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// `exp` must lie strictly in the future once skew is added.
fn is_unexpired(exp: u64, leeway_seconds: u64, now: u64) -> bool {
    now < exp.saturating_add(leeway_seconds)
}
