pub mod models;

use crate::errors::AppError;
use crate::modules::extractors::jwt::Claims;
use crate::modules::store::{decode, encode, DocumentStore, StoreError, USERS};
use anyhow::Context;
use models::UserDocument;
use tracing::debug;

/// Sync-on-login: returns the caller's user document, creating it from the
/// session claims when this identity shows up for the first time.
pub async fn sync_user(store: &dyn DocumentStore, claims: &Claims) -> Result<UserDocument, AppError> {
    if let Some(doc) = store
        .get(USERS, &claims.sub)
        .await
        .context("Failed to fetch user")?
    {
        return Ok(decode(USERS, doc)?);
    }

    let user = UserDocument::from_claims(claims);
    match store.insert(USERS, &user.id, encode(&user)?).await {
        Ok(()) => {
            debug!("created user document for {}", user.id);
            Ok(user)
        }
        // another device of the same account won the race; read theirs
        Err(StoreError::AlreadyExists { .. }) => {
            let doc = store
                .get(USERS, &claims.sub)
                .await
                .context("Failed to re-fetch user")?
                .context("User document vanished after a sync race")?;
            Ok(decode(USERS, doc)?)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_user(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Option<UserDocument>, AppError> {
    let Some(doc) = store
        .get(USERS, user_id)
        .await
        .context("Failed to fetch user")?
    else {
        return Ok(None);
    };
    Ok(Some(decode(USERS, doc)?))
}
