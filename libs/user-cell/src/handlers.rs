use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{Map, Value};

use shared_models::auth::TokenClaims;
use shared_models::error::AppError;
use shared_models::user::{UpdateResult, UserRecord};
use shared_utils::state::AppState;

use crate::models::{AdminStatus, UpsertUserResponse};
use crate::services::UserService;

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let service = UserService::new(state.store.clone());

    let users = service.list_users().await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn check_admin(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, AppError> {
    let service = UserService::new(state.store.clone());

    let admin = service.is_admin(&email).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(AdminStatus { admin }))
}

#[axum::debug_handler]
pub async fn grant_admin(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<TokenClaims>,
    Path(email): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = UserService::new(state.store.clone());

    service.grant_admin(&claims.email, &email).await
        .map_err(|e| AppError::Database(e.to_string()))?
        .map(Json)
        .ok_or_else(|| AppError::Forbidden("forbidden".to_string()))
}

/// Creates or updates the user and hands back a fresh token for them.
#[axum::debug_handler]
pub async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<UpsertUserResponse>, AppError> {
    let service = UserService::new(state.store.clone());

    let result = service.upsert_user(&email, fields).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let token = state.tokens.issue(&email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(UpsertUserResponse { result, token }))
}
