use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

/// Schema of a `Groups` document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(
        rename = "createdAt",
        with = "time::serde::rfc3339::option",
        default
    )]
    pub created_at: Option<OffsetDateTime>,
}

impl GroupDocument {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|id| id == user_id)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JoinGroupCode {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TransferAdmin {
    pub new_admin_id: String,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct InviteMember {
    #[validate(email)]
    pub email: String,
}

/// Group detail with resolved member profiles, as the group screens show it.
#[derive(Serialize, Debug)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: GroupDocument,
    pub members: Vec<GroupMember>,
}

#[derive(Serialize, Debug)]
pub struct GroupMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}
