pub mod errors;
pub mod models;

use crate::modules::ids::{unique_id, GROUP_ID_LENGTH};
use crate::modules::smtp::Mailer;
use crate::modules::store::{decode, encode, fields, DocumentStore, WriteOp, GROUPS, USERS};
use crate::utils::users::models::UserDocument;
use anyhow::Context;
use errors::*;
use models::{GroupDocument, GroupMember, GroupView};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{debug, warn};

pub async fn create_group(
    store: &dyn DocumentStore,
    name: &str,
    description: &str,
    creator_id: &str,
) -> Result<GroupDocument, GroupError> {
    let name = name.trim();
    let description = description.trim();
    if name.is_empty() || description.is_empty() {
        return Err(GroupError::MissingGroupField);
    }

    let creator = fetch_user(store, creator_id).await?;
    if creator.group_id.is_some() {
        return Err(GroupError::UserAlreadyInGroup);
    }

    let id = unique_id(store, GROUPS, GROUP_ID_LENGTH)
        .await
        .context("Failed to allocate group id")?;

    let group = GroupDocument {
        id: id.clone(),
        name: name.to_string(),
        description: description.to_string(),
        created_by: creator_id.to_string(),
        participants: vec![creator_id.to_string()],
        created_at: Some(OffsetDateTime::now_utc()),
    };

    store
        .apply(vec![
            WriteOp::Insert {
                collection: GROUPS,
                id: id.clone(),
                fields: encode(&group).context("Failed to encode group document")?,
            },
            WriteOp::Update {
                collection: USERS,
                id: creator_id.to_string(),
                fields: fields(json!({ "group_id": id, "isAdmin": true })),
            },
        ])
        .await
        .context("Failed to create group")?;

    debug!("group {} created by {creator_id}", group.id);
    Ok(group)
}

pub async fn join_group(
    store: &dyn DocumentStore,
    code: &str,
    user_id: &str,
) -> Result<GroupDocument, GroupError> {
    let code = normalize_group_code(code)?;

    let user = fetch_user(store, user_id).await?;
    if user.group_id.is_some() {
        return Err(GroupError::UserAlreadyInGroup);
    }

    let mut group = get_group(store, &code).await?;
    if group.has_participant(user_id) {
        return Err(GroupError::UserAlreadyInGroup);
    }

    store
        .apply(vec![
            WriteOp::Update {
                collection: USERS,
                id: user_id.to_string(),
                fields: fields(json!({ "group_id": code })),
            },
            WriteOp::ArrayAdd {
                collection: GROUPS,
                id: code.clone(),
                field: "participants",
                value: json!(user_id),
            },
        ])
        .await
        .context("Failed to join group")?;

    group.participants.push(user_id.to_string());
    Ok(group)
}

pub async fn remove_member(
    store: &dyn DocumentStore,
    group_id: &str,
    member_id: &str,
    requester_id: &str,
) -> Result<(), GroupError> {
    let group = get_group(store, group_id).await?;
    if !group.is_admin(requester_id) {
        return Err(GroupError::NotGroupAdmin);
    }
    if group.is_admin(member_id) {
        return Err(GroupError::CannotRemoveAdmin);
    }
    if !group.has_participant(member_id) {
        return Err(GroupError::UserNotInGroup);
    }

    store
        .apply(vec![
            WriteOp::ArrayRemove {
                collection: GROUPS,
                id: group.id.clone(),
                field: "participants",
                value: json!(member_id),
            },
            WriteOp::Update {
                collection: USERS,
                id: member_id.to_string(),
                fields: fields(json!({ "group_id": null })),
            },
        ])
        .await
        .context("Failed to remove member")?;

    Ok(())
}

pub async fn transfer_admin(
    store: &dyn DocumentStore,
    group_id: &str,
    new_admin_id: &str,
    requester_id: &str,
) -> Result<(), GroupError> {
    let group = get_group(store, group_id).await?;
    if !group.is_admin(requester_id) {
        return Err(GroupError::NotGroupAdmin);
    }
    if group.is_admin(new_admin_id) {
        return Err(GroupError::AlreadyGroupAdmin);
    }
    if !group.has_participant(new_admin_id) {
        return Err(GroupError::UserNotInGroup);
    }

    // admin status is derived from `createdBy` alone, so one write flips it
    store
        .update(
            GROUPS,
            &group.id,
            fields(json!({ "createdBy": new_admin_id })),
        )
        .await
        .context("Failed to transfer admin")?;

    Ok(())
}

pub async fn delete_group(
    store: &dyn DocumentStore,
    group_id: &str,
    requester_id: &str,
) -> Result<(), GroupError> {
    let group = get_group(store, group_id).await?;
    if !group.is_admin(requester_id) {
        return Err(GroupError::NotGroupAdmin);
    }

    // membership cascade and the group delete land in one atomic batch, so
    // no participant can end up pointing at a deleted group
    let mut writes: Vec<WriteOp> = group
        .participants
        .iter()
        .map(|participant_id| WriteOp::Update {
            collection: USERS,
            id: participant_id.clone(),
            fields: fields(json!({ "group_id": null })),
        })
        .collect();
    writes.push(WriteOp::Delete {
        collection: GROUPS,
        id: group.id.clone(),
    });

    store.apply(writes).await.context("Failed to delete group")?;

    debug!("group {} deleted by {requester_id}", group.id);
    Ok(())
}

pub async fn update_group_info(
    store: &dyn DocumentStore,
    group_id: &str,
    name: &str,
    description: &str,
    requester_id: &str,
) -> Result<(), GroupError> {
    let name = name.trim();
    let description = description.trim();
    if name.is_empty() || description.is_empty() {
        return Err(GroupError::MissingGroupField);
    }

    let group = get_group(store, group_id).await?;
    if !group.is_admin(requester_id) {
        return Err(GroupError::NotGroupAdmin);
    }

    store
        .update(
            GROUPS,
            &group.id,
            fields(json!({ "name": name, "description": description })),
        )
        .await
        .context("Failed to update group info")?;

    Ok(())
}

pub async fn get_group(
    store: &dyn DocumentStore,
    group_id: &str,
) -> Result<GroupDocument, GroupError> {
    let doc = store
        .get(GROUPS, group_id)
        .await
        .context("Failed to fetch group")?
        .ok_or(GroupError::GroupDoesNotExist)?;
    Ok(decode(GROUPS, doc).context("Failed to decode group document")?)
}

/// Group detail with member profiles resolved from the user documents.
/// Members whose documents are missing are skipped instead of failing the
/// whole view.
pub async fn get_group_view(
    store: &dyn DocumentStore,
    group_id: &str,
) -> Result<GroupView, GroupError> {
    let group = get_group(store, group_id).await?;

    let mut members = Vec::with_capacity(group.participants.len());
    for participant_id in &group.participants {
        let Some(doc) = store
            .get(USERS, participant_id)
            .await
            .context("Failed to fetch group member")?
        else {
            warn!(
                "participant {participant_id} of group {} has no user document",
                group.id
            );
            continue;
        };
        let user: UserDocument = decode(USERS, doc).context("Failed to decode group member")?;
        members.push(GroupMember {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            is_admin: group.is_admin(participant_id),
        });
    }

    Ok(GroupView { group, members })
}

pub async fn invite_member(
    store: &dyn DocumentStore,
    mailer: &Mailer,
    group_id: &str,
    email: &str,
    requester_id: &str,
) -> Result<(), GroupError> {
    if !validator::validate_email(email) {
        return Err(GroupError::InvalidEmail);
    }

    let group = get_group(store, group_id).await?;
    if !group.has_participant(requester_id) {
        return Err(GroupError::UserNotInGroup);
    }

    // informational only: the invitation goes out whether or not the address
    // already has an account
    let known = store
        .query(USERS, "email", &json!(email.to_lowercase()))
        .await
        .context("Failed to look up invited email")?;
    if known.is_empty() {
        debug!(
            "inviting address with no registered user to group {}",
            group.id
        );
    }

    mailer
        .send_group_invitation(email, &group.id)
        .await
        .map_err(|e| {
            warn!("Failed to send invitation email: {e:?}");
            GroupError::EmailDispatchFailed
        })?;

    Ok(())
}

/// Join codes are 5 alphanumeric characters, case-insensitive on input.
pub fn normalize_group_code(code: &str) -> Result<String, GroupError> {
    let code = code.trim().to_uppercase();
    if code.len() != GROUP_ID_LENGTH
        || !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(GroupError::MalformedGroupCode);
    }
    Ok(code)
}

async fn fetch_user(store: &dyn DocumentStore, user_id: &str) -> Result<UserDocument, GroupError> {
    let doc = store
        .get(USERS, user_id)
        .await
        .context("Failed to fetch user")?
        .ok_or(GroupError::UserDoesNotExist)?;
    Ok(decode(USERS, doc).context("Failed to decode user document")?)
}
