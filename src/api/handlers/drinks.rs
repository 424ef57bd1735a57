/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は route 側 (access::require) で済んでいる。ここでは AuthCtx をログ相関にだけ使う
 * - Json/Path の rejection も共通 envelope (AppError) に揃える
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        // Well-formed JSON of the wrong shape
        Err(JsonRejection::JsonDataError(e)) => Err(AppError::unprocessable(e.body_text())),
        // Body limit hit while buffering (no Content-Length up front)
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(AppError::PayloadTooLarge),
        Err(e) => Err(AppError::bad_request(e.body_text())),
    }
}

fn drink_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::new(
        drinks.iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn list_drink_details(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let (title, recipe) = json_body(payload)?
        .validate()
        .map_err(AppError::unprocessable)?;

    let drink = state.drinks.create(&title, &recipe).await?;
    tracing::info!(drink_id = drink.id, sub = %ctx.subject, "drink created");

    Ok(Json(DrinksResponse::new(vec![drink.into()])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let id = drink_id(path)?;
    let (title, recipe) = json_body(payload)?
        .validate()
        .map_err(AppError::unprocessable)?;

    let drink = state
        .drinks
        .update(id, title.as_deref(), recipe.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(drink_id = id, sub = %ctx.subject, "drink updated");

    Ok(Json(DrinksResponse::new(vec![drink.into()])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = drink_id(path)?;

    if !state.drinks.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(drink_id = id, sub = %ctx.subject, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
