pub mod models;

use crate::errors::AppError;
use crate::modules::catalog::{CatalogClient, CatalogUser};
use axum::http::StatusCode;
use models::{RankingEntry, RankingScope};
use tracing::warn;

/// Sorted-by-points view over the catalog's user list, optionally scoped to
/// one group. Recomputed in full on every call.
pub async fn get_ranking(
    catalog: &CatalogClient,
    scope: RankingScope,
    group_id: Option<&str>,
) -> Result<Vec<RankingEntry>, AppError> {
    let mut users = catalog.fetch_users().await.map_err(|e| {
        warn!("Failed to fetch users for ranking: {e:?}");
        AppError::exp(StatusCode::BAD_GATEWAY, "Ranking source unavailable")
    })?;

    if let RankingScope::Group = scope {
        let group_id = group_id.ok_or_else(|| {
            AppError::exp(StatusCode::BAD_REQUEST, "Missing group_id for group scope")
        })?;
        users.retain(|user| user.group_id.as_deref() == Some(group_id));
    }

    Ok(rank(users))
}

/// Descending by points; equal totals order ascending by user id so the
/// ranking is deterministic regardless of fetch order.
fn rank(mut users: Vec<CatalogUser>) -> Vec<RankingEntry> {
    users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.id.cmp(&b.id)));
    users.into_iter().map(RankingEntry::from).collect()
}
