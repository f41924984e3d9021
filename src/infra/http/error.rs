use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::application::validate::{FieldIssue, ValidationError};

#[derive(Debug, Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    error: Vec<FieldIssue>,
}

/// HTTP error surface for the movie API.
#[derive(Debug)]
pub enum ApiError {
    /// The referenced movie id is absent from the collection.
    NotFound,
    /// The request body failed full or partial validation.
    Validation(ValidationError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                let mut response = (
                    StatusCode::NOT_FOUND,
                    Json(MessageBody {
                        message: "Movie not found",
                    }),
                )
                    .into_response();
                ErrorReport::from_message(
                    "infra::http::api",
                    StatusCode::NOT_FOUND,
                    "movie id not present in collection",
                )
                .attach(&mut response);
                response
            }
            ApiError::Validation(err) => {
                let detail = err.to_string();
                let mut response = (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationBody { error: err.issues }),
                )
                    .into_response();
                ErrorReport::from_message("infra::http::api", StatusCode::BAD_REQUEST, detail)
                    .attach(&mut response);
                response
            }
        }
    }
}
