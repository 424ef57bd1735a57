/*
 * Responsibility
 * - URL 構造と route ごとの required permission を定義
 * - 未定義 path は 404、定義済み path の未対応 method は 405 (共通 envelope)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drink_details, list_drinks, update_drink},
    health::health,
};
use crate::error::AppError;
use crate::middleware::auth::access;
use crate::state::AppState;

/// Permissions granted by the identity provider's RBAC settings.
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).merge(access::require(
                post(create_drink),
                state,
                permissions::POST_DRINKS,
            )),
        )
        .route(
            "/drinks-detail",
            access::require(
                get(list_drink_details),
                state,
                permissions::GET_DRINKS_DETAIL,
            ),
        )
        .route(
            "/drinks/{id}",
            access::require(patch(update_drink), state, permissions::PATCH_DRINKS).merge(
                access::require(delete(delete_drink), state, permissions::DELETE_DRINKS),
            ),
        )
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
        .fallback(|| async { AppError::NotFound })
}
