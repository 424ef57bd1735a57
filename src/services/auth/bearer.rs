use axum::http::{HeaderMap, header};

use super::error::AuthError;

/// Pull the raw token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-sensitively and the value must split into
/// exactly two parts. The token itself is returned unparsed.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    parse_bearer(value)
}

pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
