use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::services::catalogue::CatalogueError;
use crate::services::draft_engine::DraftError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Draft(DraftError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Draft(DraftError::InvalidTarget(_)) => StatusCode::BAD_REQUEST,
            ApiError::Draft(DraftError::IllegalPhase { .. }) => StatusCode::CONFLICT,
            ApiError::Catalogue(CatalogueError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Catalogue(CatalogueError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Catalogue(CatalogueError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
            return (status, "There was a database issue.".to_string()).into_response();
        }
        (status, self.to_string()).into_response()
    }
}
