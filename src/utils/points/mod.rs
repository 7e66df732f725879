pub mod errors;

use crate::modules::store::{fields, timestamp_value, DocumentStore, StoreError, WriteOp, USERS};
use errors::PointsError;
use serde_json::json;
use time::OffsetDateTime;

/// Adds a non-negative point delta to one user's running total. The delta
/// is applied with the store's atomic increment, so concurrent completions
/// crediting the same user cannot lose an update.
pub async fn add_points(
    store: &dyn DocumentStore,
    user_id: &str,
    delta: i64,
) -> Result<(), PointsError> {
    let writes = point_writes(user_id, delta, OffsetDateTime::now_utc());
    match store.apply(writes).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound { .. }) => Err(PointsError::UserDoesNotExist),
        Err(e) => Err(PointsError::Unexpected(anyhow::Error::new(e))),
    }
}

/// The write pair crediting one participant, for callers that fold the
/// payout into a larger atomic batch.
pub fn point_writes(user_id: &str, delta: i64, now: OffsetDateTime) -> Vec<WriteOp> {
    debug_assert!(delta >= 0, "point rewards never decrease a total");
    vec![
        WriteOp::Increment {
            collection: USERS,
            id: user_id.to_string(),
            field: "points",
            delta,
        },
        WriteOp::Update {
            collection: USERS,
            id: user_id.to_string(),
            fields: fields(json!({ "lastPointsUpdate": timestamp_value(now) })),
        },
    ]
}
