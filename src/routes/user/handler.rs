use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::{Query, QueryRejection};

use crate::{AppState, error::AppError};

use super::model::{DeleteUserQuery, UserPayload};

fn parse_payload(body: &[u8]) -> Result<UserPayload, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let payload = state.users.list_users().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let req = parse_payload(&body)?;
    state
        .users
        .create_user(req.username(), req.email())
        .await?;
    Ok(StatusCode::CREATED)
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let req = parse_payload(&body)?;
    state
        .users
        .update_user_email(req.username(), req.email())
        .await?;
    Ok(StatusCode::OK)
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    query: Result<Query<DeleteUserQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.to_string()))?;
    state.users.delete_user(&query.username).await?;
    Ok(StatusCode::OK)
}
