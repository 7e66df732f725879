use crate::modules::catalog::CatalogClient;
use crate::modules::extractors::jwt::Claims;
use crate::modules::store::DynStore;
use crate::state::AppState;
use crate::utils::tasks::errors::TaskError;
use crate::utils::tasks::models::{CompletionResult, NewTask, TaskDocument};
use crate::utils::tasks::{complete_task, create_task, get_task, list_user_tasks};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(post_create_task).get(get_user_tasks))
        .route("/:task_id", get(get_task_by_id))
        .route("/:task_id/complete", post(post_complete_task))
}

async fn post_create_task(
    State(store): State<DynStore>,
    claims: Claims,
    Json(new_task): Json<NewTask>,
) -> Result<Json<TaskDocument>, TaskError> {
    let task = create_task(&*store, new_task, &claims.sub).await?;
    Ok(Json(task))
}

async fn get_user_tasks(
    State(catalog): State<CatalogClient>,
    claims: Claims,
) -> Json<Vec<TaskDocument>> {
    Json(list_user_tasks(&catalog, &claims.sub).await)
}

async fn get_task_by_id(
    State(store): State<DynStore>,
    _claims: Claims,
    Path(task_id): Path<String>,
) -> Result<Json<TaskDocument>, TaskError> {
    Ok(Json(get_task(&*store, &task_id).await?))
}

async fn post_complete_task(
    State(store): State<DynStore>,
    State(catalog): State<CatalogClient>,
    claims: Claims,
    Path(task_id): Path<String>,
) -> Result<Json<CompletionResult>, TaskError> {
    let result = complete_task(&*store, &catalog, &task_id, &claims.sub).await?;
    Ok(Json(result))
}
