use crate::errors::AppError;
use crate::modules::catalog::CatalogClient;
use crate::modules::extractors::jwt::Claims;
use crate::state::AppState;
use crate::utils::ranking::get_ranking;
use crate::utils::ranking::models::{RankingEntry, RankingScope};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_ranking_view))
}

#[derive(Deserialize)]
struct RankingParams {
    #[serde(default)]
    scope: RankingScope,
    group_id: Option<String>,
}

async fn get_ranking_view(
    State(catalog): State<CatalogClient>,
    _claims: Claims,
    Query(params): Query<RankingParams>,
) -> Result<Json<Vec<RankingEntry>>, AppError> {
    let ranking = get_ranking(&catalog, params.scope, params.group_id.as_deref()).await?;
    Ok(Json(ranking))
}
