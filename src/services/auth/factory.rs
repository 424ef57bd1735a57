/// Factory: build the request `Authorizer` from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{
    Authorizer, JwksError, RemoteJwks, RemoteJwksSettings, TokenPolicy, TokenVerifier,
};

pub fn build_authorizer(config: &AuthConfig) -> Result<Arc<Authorizer>, JwksError> {
    let jwks = RemoteJwks::new(RemoteJwksSettings {
        url: config.jwks_url.clone(),
        ttl: config.jwks_cache_ttl,
        min_refresh_interval: config.jwks_min_refresh_interval,
        fetch_timeout: config.jwks_fetch_timeout,
    })?;

    let policy = TokenPolicy {
        issuer: config.issuer.clone(),
        audience: config.audience.clone(),
        algorithms: config.algorithms.clone(),
        leeway_seconds: config.leeway_seconds,
    };

    tracing::info!(
        domain = %config.domain,
        issuer = %policy.issuer,
        audience = %policy.audience,
        jwks_url = %config.jwks_url,
        "token verification configured"
    );

    Ok(Arc::new(Authorizer::new(TokenVerifier::new(
        policy,
        Arc::new(jwks),
    ))))
}
