use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Missing one or more task fields")]
    MissingTaskField,
    #[error("Select at least one participant")]
    NoParticipants,
    #[error("Group does not exist")]
    GroupDoesNotExist,
    #[error("User not in group")]
    UserNotInGroup,
    #[error("A chosen participant is not in the group")]
    ParticipantNotInGroup,
    #[error("Task does not exist")]
    TaskDoesNotExist,
    #[error("Task is already completed")]
    TaskAlreadyCompleted,
    #[error("User is not a task participant")]
    UserNotParticipant,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl IntoResponse for TaskError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            TaskError::MissingTaskField => StatusCode::BAD_REQUEST,
            TaskError::NoParticipants => StatusCode::BAD_REQUEST,
            TaskError::GroupDoesNotExist => StatusCode::NOT_FOUND,
            TaskError::UserNotInGroup => StatusCode::FORBIDDEN,
            TaskError::ParticipantNotInGroup => StatusCode::BAD_REQUEST,
            TaskError::TaskDoesNotExist => StatusCode::NOT_FOUND,
            TaskError::TaskAlreadyCompleted => StatusCode::CONFLICT,
            TaskError::UserNotParticipant => StatusCode::FORBIDDEN,
            TaskError::UnknownDifficulty => StatusCode::BAD_REQUEST,
            TaskError::Unexpected(e) => {
                tracing::error!("Internal server error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let info = match self {
            TaskError::Unexpected(_) => "Unexpected server error".into(),
            _ => format!("{self:?}"),
        };

        (status_code, Json(json!({ "error_info": info }))).into_response()
    }
}
