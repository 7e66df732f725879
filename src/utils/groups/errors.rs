use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Missing one or more group fields")]
    MissingGroupField,
    #[error("Malformed group code")]
    MalformedGroupCode,
    #[error("Group does not exist")]
    GroupDoesNotExist,
    #[error("User does not exist")]
    UserDoesNotExist,
    #[error("Already in group")]
    UserAlreadyInGroup,
    #[error("User not in group")]
    UserNotInGroup,
    #[error("Only the group admin can do that")]
    NotGroupAdmin,
    #[error("The admin cannot be removed from the group")]
    CannotRemoveAdmin,
    #[error("User is already the group admin")]
    AlreadyGroupAdmin,
    #[error("Invalid invitation email")]
    InvalidEmail,
    #[error("Failed to send the invitation email")]
    EmailDispatchFailed,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl IntoResponse for GroupError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            GroupError::MissingGroupField => StatusCode::BAD_REQUEST,
            GroupError::MalformedGroupCode => StatusCode::BAD_REQUEST,
            GroupError::GroupDoesNotExist => StatusCode::NOT_FOUND,
            GroupError::UserDoesNotExist => StatusCode::NOT_FOUND,
            GroupError::UserAlreadyInGroup => StatusCode::BAD_REQUEST,
            GroupError::UserNotInGroup => StatusCode::BAD_REQUEST,
            GroupError::NotGroupAdmin => StatusCode::FORBIDDEN,
            GroupError::CannotRemoveAdmin => StatusCode::FORBIDDEN,
            GroupError::AlreadyGroupAdmin => StatusCode::BAD_REQUEST,
            GroupError::InvalidEmail => StatusCode::BAD_REQUEST,
            GroupError::EmailDispatchFailed => StatusCode::BAD_GATEWAY,
            GroupError::Unexpected(e) => {
                tracing::error!("Internal server error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let info = match self {
            GroupError::Unexpected(_) => "Unexpected server error".into(),
            _ => format!("{self:?}"),
        };

        (status_code, Json(json!({ "error_info": info }))).into_response()
    }
}
