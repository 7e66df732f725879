pub mod errors;
pub mod models;

use crate::modules::catalog::CatalogClient;
use crate::modules::ids::{unique_id, TASK_ID_LENGTH};
use crate::modules::store::{
    decode, encode, fields, timestamp_value, DocumentStore, WriteOp, TASKS,
};
use crate::utils::groups;
use crate::utils::groups::errors::GroupError;
use crate::utils::points;
use anyhow::Context;
use errors::*;
use models::{CompletionResult, NewTask, TaskDocument, TaskStatus};
use serde_json::json;
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::{debug, warn};

pub async fn create_task(
    store: &dyn DocumentStore,
    new_task: NewTask,
    creator_id: &str,
) -> Result<TaskDocument, TaskError> {
    let name = new_task.name.trim();
    if name.is_empty() {
        return Err(TaskError::MissingTaskField);
    }
    let mut participants = new_task.participants;
    let mut seen = HashSet::new();
    participants.retain(|id| seen.insert(id.clone()));
    if participants.is_empty() {
        return Err(TaskError::NoParticipants);
    }

    let group = groups::get_group(store, &new_task.group_id)
        .await
        .map_err(|e| match e {
            GroupError::GroupDoesNotExist => TaskError::GroupDoesNotExist,
            other => TaskError::Unexpected(anyhow::Error::new(other)),
        })?;

    // eligibility is checked against the live roster, not the snapshot the
    // client picked participants from
    if !group.has_participant(creator_id) {
        return Err(TaskError::UserNotInGroup);
    }
    if participants.iter().any(|id| !group.has_participant(id)) {
        return Err(TaskError::ParticipantNotInGroup);
    }

    let id = unique_id(store, TASKS, TASK_ID_LENGTH)
        .await
        .context("Failed to allocate task id")?;

    let task = TaskDocument {
        id: id.clone(),
        name: name.to_string(),
        description: new_task.description.trim().to_string(),
        difficulty: new_task.difficulty,
        category: new_task.category.trim().to_string(),
        group_id: group.id,
        participants,
        status: TaskStatus::Pending,
        created_by: creator_id.to_string(),
        created_at: Some(OffsetDateTime::now_utc()),
        completed_at: None,
        completed_by: None,
    };

    store
        .insert(
            TASKS,
            &id,
            encode(&task).context("Failed to encode task document")?,
        )
        .await
        .context("Failed to create task")?;

    debug!("task {} created in group {}", task.id, task.group_id);
    Ok(task)
}

/// Completes a pending task and pays out its difficulty reward to every
/// participant. The status flip and all point increments land in one atomic
/// batch; a task can never read `Finalizada` while some participant is
/// missing their points.
pub async fn complete_task(
    store: &dyn DocumentStore,
    catalog: &CatalogClient,
    task_id: &str,
    user_id: &str,
) -> Result<CompletionResult, TaskError> {
    let task = get_task(store, task_id).await?;

    if task.status == TaskStatus::Completed {
        return Err(TaskError::TaskAlreadyCompleted);
    }
    if !task.has_participant(user_id) {
        return Err(TaskError::UserNotParticipant);
    }

    let difficulty = catalog
        .difficulty_by_id(task.difficulty)
        .await
        .ok_or(TaskError::UnknownDifficulty)?;

    let now = OffsetDateTime::now_utc();
    let mut writes = vec![WriteOp::Update {
        collection: TASKS,
        id: task.id.clone(),
        fields: fields(json!({
            "status": TaskStatus::Completed.as_str(),
            "completedAt": timestamp_value(now),
            "completedBy": user_id,
        })),
    }];
    for participant_id in &task.participants {
        writes.extend(points::point_writes(participant_id, difficulty.points, now));
    }

    store
        .apply(writes)
        .await
        .context("Failed to complete task")?;

    // the catalog mirror is best effort; the document store is the source
    // of truth for task state
    if let Err(e) = catalog
        .update_task_status(&task.id, TaskStatus::Completed.as_str())
        .await
    {
        warn!("Failed to mirror completion of task {} to catalog: {e:?}", task.id);
    }

    debug!(
        "task {} completed by {user_id}, {} points to {} participants",
        task.id,
        difficulty.points,
        task.participants.len()
    );

    Ok(CompletionResult {
        message: format!("Tarefa concluída! Você ganhou {} pontos!", difficulty.points),
        points_awarded: difficulty.points,
    })
}

pub async fn get_task(store: &dyn DocumentStore, task_id: &str) -> Result<TaskDocument, TaskError> {
    let doc = store
        .get(TASKS, task_id)
        .await
        .context("Failed to fetch task")?
        .ok_or(TaskError::TaskDoesNotExist)?;
    Ok(decode(TASKS, doc).context("Failed to decode task document")?)
}

/// The home screen's task list comes from the catalog service and degrades
/// to empty when the catalog is unreachable.
pub async fn list_user_tasks(catalog: &CatalogClient, user_id: &str) -> Vec<TaskDocument> {
    match catalog.fetch_user_tasks(user_id).await {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!("Failed to fetch task list for {user_id}, degrading to empty: {e:?}");
            Vec::new()
        }
    }
}
