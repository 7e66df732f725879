use crate::modules::extractors::jwt::Claims;
use crate::modules::smtp::Mailer;
use crate::modules::store::DynStore;
use crate::state::AppState;
use crate::utils::groups::errors::GroupError;
use crate::utils::groups::models::{
    GroupDocument, GroupView, InviteMember, JoinGroupCode, NewGroup, TransferAdmin,
};
use crate::utils::groups::*;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use validator::Validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(post_create_group))
        .route("/join", post(post_join_group))
        .route(
            "/:group_id",
            get(get_group_by_id)
                .patch(patch_group_info)
                .delete(delete_group_by_id),
        )
        .route("/:group_id/members/:member_id", delete(delete_group_member))
        .route("/:group_id/admin", post(post_transfer_admin))
        .route("/:group_id/invitations", post(post_invite_member))
}

async fn post_create_group(
    State(store): State<DynStore>,
    claims: Claims,
    Json(group): Json<NewGroup>,
) -> Result<Json<GroupDocument>, GroupError> {
    let group = create_group(&*store, &group.name, &group.description, &claims.sub).await?;
    Ok(Json(group))
}

async fn post_join_group(
    State(store): State<DynStore>,
    claims: Claims,
    Json(payload): Json<JoinGroupCode>,
) -> Result<Json<GroupDocument>, GroupError> {
    let group = join_group(&*store, &payload.code, &claims.sub).await?;
    Ok(Json(group))
}

async fn get_group_by_id(
    State(store): State<DynStore>,
    _claims: Claims,
    Path(group_id): Path<String>,
) -> Result<Json<GroupView>, GroupError> {
    Ok(Json(get_group_view(&*store, &group_id).await?))
}

async fn patch_group_info(
    State(store): State<DynStore>,
    claims: Claims,
    Path(group_id): Path<String>,
    Json(info): Json<NewGroup>,
) -> Result<(), GroupError> {
    update_group_info(&*store, &group_id, &info.name, &info.description, &claims.sub).await
}

async fn delete_group_by_id(
    State(store): State<DynStore>,
    claims: Claims,
    Path(group_id): Path<String>,
) -> Result<(), GroupError> {
    delete_group(&*store, &group_id, &claims.sub).await
}

async fn delete_group_member(
    State(store): State<DynStore>,
    claims: Claims,
    Path((group_id, member_id)): Path<(String, String)>,
) -> Result<(), GroupError> {
    remove_member(&*store, &group_id, &member_id, &claims.sub).await
}

async fn post_transfer_admin(
    State(store): State<DynStore>,
    claims: Claims,
    Path(group_id): Path<String>,
    Json(payload): Json<TransferAdmin>,
) -> Result<(), GroupError> {
    transfer_admin(&*store, &group_id, &payload.new_admin_id, &claims.sub).await
}

async fn post_invite_member(
    State(store): State<DynStore>,
    State(smtp): State<Mailer>,
    claims: Claims,
    Path(group_id): Path<String>,
    Json(payload): Json<InviteMember>,
) -> Result<(), GroupError> {
    payload
        .validate()
        .map_err(|_| GroupError::InvalidEmail)?;
    invite_member(&*store, &smtp, &group_id, &payload.email, &claims.sub).await
}
