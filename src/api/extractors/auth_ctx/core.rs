use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthError;

use super::AuthCtx;

/// 認可済み route の handler 引数
///
/// `access::require` が通した request にだけ AuthCtx が入っている。
/// gate の付いていない route で使うと invalid_header (401) になる。
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(ctx) = parts.extensions.get::<AuthCtx>() else {
            tracing::error!(path = %parts.uri.path(), "AuthCtxExtractor used on an ungated route");
            return Err(AuthError::MissingHeader.into());
        };

        Ok(AuthCtxExtractor(ctx.clone()))
    }
}
