use crate::errors::AppError;
use crate::modules::extractors::jwt::Claims;
use crate::modules::store::DynStore;
use crate::state::AppState;
use crate::utils::users::models::UserDocument;
use crate::utils::users::{get_user, sync_user};
use axum::http::StatusCode;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sync", post(post_sync_user))
        .route("/me", get(get_current_user))
}

async fn post_sync_user(
    State(store): State<DynStore>,
    claims: Claims,
) -> Result<Json<UserDocument>, AppError> {
    Ok(Json(sync_user(&*store, &claims).await?))
}

async fn get_current_user(
    State(store): State<DynStore>,
    claims: Claims,
) -> Result<Json<UserDocument>, AppError> {
    let user = get_user(&*store, &claims.sub)
        .await?
        .ok_or_else(|| AppError::exp(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(user))
}
