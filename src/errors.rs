use crate::modules::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{code} - {message}")]
    Expected { code: StatusCode, message: String },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    fn json(error: String) -> Json<Self> {
        Json(Self { error })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.to_string();
        let (code, message) = match self {
            AppError::Expected { code, message } => {
                debug!("{error_message}");
                (code, ErrorResponse::json(message))
            }
            AppError::Unexpected(e) => {
                error!("Internal server error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::json("Unexpected server error".into()),
                )
            }
        };
        (code, message).into_response()
    }
}

impl AppError {
    pub fn exp(code: StatusCode, message: &str) -> Self {
        Self::Expected {
            code,
            message: message.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(val: StoreError) -> Self {
        match val {
            StoreError::NotFound { collection, id } => Self::exp(
                StatusCode::NOT_FOUND,
                &format!("{collection} document {id} not found"),
            ),
            StoreError::AlreadyExists { collection, id } => Self::exp(
                StatusCode::CONFLICT,
                &format!("{collection} document {id} already exists"),
            ),
            other => Self::Unexpected(anyhow::Error::new(other)),
        }
    }
}
