//! Bearer token 検証 + permission チェック → AuthCtx を extensions に入れる
//!
//! - ルート単位で required permission を宣言する (`require`)
//! - 失敗時は AuthError の (kind, status) をそのまま AppError で返す
//! - 内部エラー (jsonwebtoken / JWKS fetch) の詳細はログにだけ出す

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::Authorizer;
use crate::state::AppState;

/// Per-route gate: which authorizer, which permission.
#[derive(Clone)]
struct PermissionGate {
    auth: Arc<Authorizer>,
    permission: &'static str,
}

/// Guard a route with `permission`.
///
/// 例：
/// ```ignore
/// let create = access::require(post(create_drink), &state, "post:drinks");
/// router.route("/drinks", get(list_drinks).merge(create))
/// ```
pub fn require<S>(
    route: MethodRouter<S>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let gate = PermissionGate {
        auth: state.auth.clone(),
        permission,
    };

    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    route.route_layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<PermissionGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match gate.auth.authorize(req.headers(), gate.permission).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                kind = err.message(),
                permission = gate.permission,
                "authorization denied"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(sub = %claims.sub, permission = gate.permission, "authorization granted");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(claims));

    Ok(next.run(req).await)
}
