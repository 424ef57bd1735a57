/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware (access::require) が検証して request extensions に格納する
 */

use crate::services::auth::Claims;

/// 認可済みのリクエストに付与されるコンテキスト
///
/// `subject` は identity provider 側のユーザー ID (`sub`)。ログ相関に使う。
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
}

impl From<Claims> for AuthCtx {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
        }
    }
}
