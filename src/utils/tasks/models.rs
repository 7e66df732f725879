use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Schema of a `Tasks` document. The catalog service returns the same shape
/// from `GET /tasks/user/{uid}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskDocument {
    pub id: String,
    #[serde(rename = "taskName")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: i64,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "idGroup")]
    pub group_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub status: TaskStatus,
    #[serde(rename = "createdBy", default)]
    pub created_by: String,
    #[serde(
        rename = "createdAt",
        with = "time::serde::rfc3339::option",
        default
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        rename = "completedAt",
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(
        rename = "completedBy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_by: Option<String>,
}

impl TaskDocument {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|id| id == user_id)
    }
}

/// Task status on the wire, in the store's own vocabulary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Finalizada")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendente",
            TaskStatus::Completed => "Finalizada",
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NewTask {
    pub group_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: i64,
    pub participants: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CompletionResult {
    pub message: String,
    pub points_awarded: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_store_vocabulary() {
        let task: TaskDocument = serde_json::from_value(json!({
            "id": "AB12CD34",
            "taskName": "Limpar cozinha",
            "difficulty": 2,
            "idGroup": "AB12C",
            "participants": ["u1"],
            "status": "Pendente",
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.category, "");
        assert_eq!(task.completed_by, None);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["status"], json!("Pendente"));
        assert_eq!(back["taskName"], json!("Limpar cozinha"));
        assert!(back.get("completedAt").is_none());
    }
}
