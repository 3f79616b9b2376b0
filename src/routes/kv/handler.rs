use axum::{extract::State, http::StatusCode};
use axum_extra::extract::{Query, QueryRejection};

use crate::{AppState, error::AppError};

use super::model::KvQuery;

fn parse_query(query: Result<Query<KvQuery>, QueryRejection>) -> Result<KvQuery, AppError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

#[axum::debug_handler]
pub async fn set_string(
    State(state): State<AppState>,
    query: Result<Query<KvQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let query = parse_query(query)?;
    state.kv.set_string(&query.key, query.first_value()).await?;
    Ok(StatusCode::OK)
}

#[axum::debug_handler]
pub async fn get_string(
    State(state): State<AppState>,
    query: Result<Query<KvQuery>, QueryRejection>,
) -> Result<String, AppError> {
    let query = parse_query(query)?;
    let value = state.kv.get_string(&query.key).await?;
    Ok(format!("Value for key {}: {}\n", query.key, value))
}

#[axum::debug_handler]
pub async fn set_list(
    State(state): State<AppState>,
    query: Result<Query<KvQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let query = parse_query(query)?;
    state.kv.push_list(&query.key, &query.value).await?;
    Ok(StatusCode::OK)
}

#[axum::debug_handler]
pub async fn get_list(
    State(state): State<AppState>,
    query: Result<Query<KvQuery>, QueryRejection>,
) -> Result<String, AppError> {
    let query = parse_query(query)?;
    let values = state.kv.range_list(&query.key).await?;
    Ok(format!("Values for key {}: [{}]\n", query.key, values.join(" ")))
}

#[axum::debug_handler]
pub async fn set_hash(
    State(state): State<AppState>,
    query: Result<Query<KvQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let query = parse_query(query)?;
    state
        .kv
        .set_hash_field(&query.key, &query.field, query.first_value())
        .await?;
    Ok(StatusCode::OK)
}

#[axum::debug_handler]
pub async fn get_hash(
    State(state): State<AppState>,
    query: Result<Query<KvQuery>, QueryRejection>,
) -> Result<String, AppError> {
    let query = parse_query(query)?;
    let value = state.kv.get_hash_field(&query.key, &query.field).await?;
    Ok(format!(
        "Value for field {} in key {}: {}\n",
        query.field, query.key, value
    ))
}
