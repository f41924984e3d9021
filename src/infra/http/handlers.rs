//! Movie collection handlers: one per verb and path.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::application::validate::{validate_movie, validate_partial_movie};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub genre: Option<String>,
}

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hola Mundo" }))
}

pub async fn list_movies(
    State(state): State<ApiState>,
    Query(query): Query<MovieListQuery>,
) -> impl IntoResponse {
    let movies = match query.genre.as_deref() {
        Some(tag) => state.store.list_by_genre(tag).await,
        None => state.store.list_all().await,
    };
    Json(movies)
}

pub async fn get_movie(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_movie_id(&id)?;
    match state.store.get(id).await {
        Some(movie) => Ok(Json(movie)),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create_movie(
    State(state): State<ApiState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate_movie(&payload)?;
    let movie = state.store.create(draft).await;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    // Validation failures outrank a missing id, matching create's contract.
    let patch = validate_partial_movie(&payload)?;
    let id = parse_movie_id(&id)?;

    let movie = state
        .store
        .update(id, patch)
        .await
        .map_err(|_| ApiError::NotFound)?;
    Ok(Json(movie))
}

pub async fn delete_movie(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_movie_id(&id)?;
    state
        .store
        .delete(id)
        .await
        .map_err(|_| ApiError::NotFound)?;
    Ok(Json(json!({ "message": "Movie deleted successfully" })))
}

// Ids are UUIDs; a string that cannot be one names no record, so it maps to
// not-found rather than bad-request.
fn parse_movie_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}
