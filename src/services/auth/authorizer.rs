use axum::http::HeaderMap;

use super::bearer::extract_token;
use super::claims::Claims;
use super::error::AuthError;
use super::permissions::check_permission;
use super::verifier::TokenVerifier;

/// Request-level entry point: bearer extraction, token verification, then
/// the route's permission check. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct Authorizer {
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required_permission: &str,
    ) -> Result<Claims, AuthError> {
        let token = extract_token(headers)?;
        let claims = self.verifier.verify(token).await?;
        check_permission(&claims, required_permission)?;

        Ok(claims)
    }
}
